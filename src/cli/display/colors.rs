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

//! Color theme for CLI output

use crate::infrastructure::constants::AUTO_DNS_SUFFIXES;
use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub error: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            error: TableColor::Red,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    /// Custom domains are green, magic DNS yellow, a missing domain red
    pub fn get_domain_color(&self, domain: &str) -> TableColor {
        if domain.is_empty() {
            self.error
        } else if AUTO_DNS_SUFFIXES.iter().any(|s| domain.ends_with(s)) {
            self.warning
        } else {
            self.success
        }
    }

    /// Muted for values that were left unset
    pub fn get_value_color(&self, value: Option<&str>) -> TableColor {
        match value {
            Some(v) if !v.is_empty() => self.info,
            _ => self.muted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = ColorTheme::default();
        assert_eq!(theme.success, TableColor::Green);
        assert_eq!(theme.warning, TableColor::Yellow);
        assert_eq!(theme.error, TableColor::Red);
    }

    #[test]
    fn test_get_domain_color() {
        let theme = ColorTheme::default();
        assert_eq!(theme.get_domain_color("apps.example.com"), TableColor::Green);
        assert_eq!(theme.get_domain_color("1.2.3.4.nip.io"), TableColor::Yellow);
        assert_eq!(theme.get_domain_color(""), TableColor::Red);
    }

    #[test]
    fn test_get_value_color() {
        let theme = ColorTheme::default();
        assert_eq!(theme.get_value_color(Some("10.0.0.5")), TableColor::Cyan);
        assert_eq!(theme.get_value_color(Some("")), TableColor::DarkGrey);
        assert_eq!(theme.get_value_color(None), TableColor::DarkGrey);
    }
}
