// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Status icons for CLI output

use crate::infrastructure::constants::AUTO_DNS_SUFFIXES;

pub struct StatusIcon;

impl StatusIcon {
    pub const SUCCESS: &'static str = "✓";

    pub const WARNING: &'static str = "⚠";

    pub const ERROR: &'static str = "✗";

    pub const UNKNOWN: &'static str = "?";

    pub fn get_domain_icon(domain: &str) -> &'static str {
        match Self::get_domain_kind(domain) {
            "Custom" => Self::SUCCESS,
            "Magic DNS" => Self::WARNING,
            _ => Self::ERROR,
        }
    }

    /// Short label for where the domain's DNS comes from
    pub fn get_domain_kind(domain: &str) -> &'static str {
        if domain.is_empty() {
            "Missing"
        } else if AUTO_DNS_SUFFIXES.iter().any(|s| domain.ends_with(s)) {
            "Magic DNS"
        } else {
            "Custom"
        }
    }

    pub fn get_flag_icon(enabled: bool) -> &'static str {
        if enabled {
            Self::SUCCESS
        } else {
            Self::UNKNOWN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_domain_icon() {
        assert_eq!(StatusIcon::get_domain_icon("apps.example.com"), StatusIcon::SUCCESS);
        assert_eq!(StatusIcon::get_domain_icon("1.2.3.4.xip.io"), StatusIcon::WARNING);
        assert_eq!(StatusIcon::get_domain_icon(""), StatusIcon::ERROR);
    }

    #[test]
    fn test_get_domain_kind() {
        assert_eq!(StatusIcon::get_domain_kind("35.205.151.95.nip.io"), "Magic DNS");
        assert_eq!(StatusIcon::get_domain_kind("dev.eu-de.containers.appdomain.cloud"), "Custom");
        assert_eq!(StatusIcon::get_domain_kind(""), "Missing");
    }
}
