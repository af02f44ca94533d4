use std::io::{self, BufRead, Write};

/// User-facing side of a screen: blocking messages and yes/no confirmation.
pub trait Prompt: Send + Sync {
    fn confirm(&self, question: &str) -> bool;
    fn alert(&self, message: &str);
}

/// Prompt on the controlling terminal.
pub struct TerminalPrompt {
    /// Answer every confirmation with yes without asking.
    pub assume_yes: bool,
}

impl Prompt for TerminalPrompt {
    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let mut out = io::stdout().lock();
        if write!(out, "{} [y/N] ", question).and_then(|_| out.flush()).is_err() {
            return false;
        }
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_lowercase().as_str(), "y" | "yes" | "ya")
    }

    fn alert(&self, message: &str) {
        eprintln!("{}", message);
    }
}

#[cfg(test)]
pub mod scripted {
    use std::sync::Mutex;

    use super::Prompt;

    /// Fixed answer to every confirmation; keeps what it was shown.
    pub struct ScriptedPrompt {
        answer: bool,
        pub questions: Mutex<Vec<String>>,
        pub alerts: Mutex<Vec<String>>,
    }

    impl ScriptedPrompt {
        pub fn answering(answer: bool) -> Self {
            Self {
                answer,
                questions: Mutex::default(),
                alerts: Mutex::default(),
            }
        }

        pub fn alerts(&self) -> Vec<String> {
            self.alerts.lock().unwrap().clone()
        }
    }

    impl Prompt for ScriptedPrompt {
        fn confirm(&self, question: &str) -> bool {
            self.questions.lock().unwrap().push(question.to_string());
            self.answer
        }

        fn alert(&self, message: &str) {
            self.alerts.lock().unwrap().push(message.to_string());
        }
    }
}
