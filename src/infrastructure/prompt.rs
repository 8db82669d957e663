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

//! Interactive prompting

use crate::shared::error::IngressError;
use colored::Colorize;
use std::io::{BufRead, BufReader, Write};
use std::sync::Mutex;
use tokio::runtime::{Handle, RuntimeFlavor};

/// User interaction needed while resolving a domain.
pub trait Prompter: Send + Sync {
    /// Asks a yes/no question.
    fn confirm(&self, question: &str, default: bool, help: &str) -> Result<bool, IngressError>;

    /// Asks for a domain. An empty answer takes `default` when one is given.
    fn ask_domain(
        &self,
        message: &str,
        default: Option<&str>,
        help: &str,
    ) -> Result<String, IngressError>;
}

/// Domain answers must be present and contain no whitespace.
pub fn validate_domain_answer(answer: &str) -> Result<(), String> {
    if answer.is_empty() {
        return Err("Value is required".to_string());
    }
    if answer.chars().any(char::is_whitespace) {
        return Err(format!("'{}' must not contain whitespace", answer));
    }
    Ok(())
}

/// Never touches the terminal: every question takes its default.
#[derive(Debug, Default, Clone)]
pub struct BatchPrompter;

impl Prompter for BatchPrompter {
    fn confirm(&self, _question: &str, default: bool, _help: &str) -> Result<bool, IngressError> {
        Ok(default)
    }

    fn ask_domain(
        &self,
        message: &str,
        default: Option<&str>,
        _help: &str,
    ) -> Result<String, IngressError> {
        default.map(str::to_string).ok_or_else(|| {
            IngressError::Prompt(format!("'{}' needs an answer in batch mode", message.trim()))
        })
    }
}

/// Line-based prompts on stdin/stdout.
pub struct StdioPrompter {
    input: Mutex<Box<dyn BufRead + Send>>,
    output: Mutex<Box<dyn Write + Send>>,
}

impl Default for StdioPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl StdioPrompter {
    pub fn new() -> Self {
        Self::with_io(BufReader::new(std::io::stdin()), std::io::stdout())
    }

    pub fn with_io(input: impl BufRead + Send + 'static, output: impl Write + Send + 'static) -> Self {
        Self {
            input: Mutex::new(Box::new(input)),
            output: Mutex::new(Box::new(output)),
        }
    }

    fn ask_line(&self, prompt: &str) -> Result<String, IngressError> {
        {
            let mut output = self
                .output
                .lock()
                .map_err(|_| IngressError::Prompt("terminal output is poisoned".to_string()))?;
            write!(output, "{}", prompt)?;
            output.flush()?;
        }

        let mut line = String::new();
        let read = off_runtime(|| {
            self.input
                .lock()
                .map_err(|_| IngressError::Prompt("terminal input is poisoned".to_string()))?
                .read_line(&mut line)
                .map_err(IngressError::from)
        })?;
        if read == 0 {
            return Err(IngressError::Prompt("unexpected end of input".to_string()));
        }
        Ok(line.trim().to_string())
    }

    fn say(&self, message: &str) -> Result<(), IngressError> {
        let mut output = self
            .output
            .lock()
            .map_err(|_| IngressError::Prompt("terminal output is poisoned".to_string()))?;
        writeln!(output, "{}", message)?;
        Ok(())
    }
}

// Stdin reads block. `block_in_place` panics outside the multi-thread runtime.
fn off_runtime<T>(read: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(read)
        }
        _ => read(),
    }
}

impl Prompter for StdioPrompter {
    fn confirm(&self, question: &str, default: bool, help: &str) -> Result<bool, IngressError> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            let answer = self.ask_line(&format!("{} {} ({}) ", "?".green(), question, hint))?;
            match answer.to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                "?" => self.say(&help.bright_black().to_string())?,
                _ => self.say(&format!("{} please answer yes or no", "✗".red()))?,
            }
        }
    }

    fn ask_domain(
        &self,
        message: &str,
        default: Option<&str>,
        help: &str,
    ) -> Result<String, IngressError> {
        let prompt = match default {
            Some(d) if !d.is_empty() => format!("{} {} ({}) ", "?".green(), message, d),
            _ => format!("{} {} ", "?".green(), message),
        };
        loop {
            let mut answer = self.ask_line(&prompt)?;
            if answer == "?" {
                self.say(&help.bright_black().to_string())?;
                continue;
            }
            if answer.is_empty() {
                answer = default.unwrap_or_default().to_string();
            }
            match validate_domain_answer(&answer) {
                Ok(()) => return Ok(answer),
                Err(reason) => self.say(&format!("{} {}", "✗".red(), reason))?,
            }
        }
    }
}
