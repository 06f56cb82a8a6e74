use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use p4overlay::p4::CommandRunner;

/// Maps exact argv vectors to canned output and records every invocation, so
/// tests can drive the pipeline without a Perforce server.
pub struct ScriptedRunner {
    responses: HashMap<Vec<String>, String>,
    calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        ScriptedRunner {
            responses: HashMap::new(),
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn respond(mut self, argv: &[&str], output: &str) -> Self {
        self.responses.insert(key(argv), output.to_string());
        self
    }

    /// Shared handle to the recorded invocations; clone before boxing the
    /// runner into `Perforce`.
    pub fn calls(&self) -> Rc<RefCell<Vec<Vec<String>>>> {
        Rc::clone(&self.calls)
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, argv: &[&str]) -> String {
        let key = key(argv);
        self.calls.borrow_mut().push(key.clone());
        self.responses.get(&key).cloned().unwrap_or_default()
    }

    fn status(&self, argv: &[&str]) -> bool {
        self.calls.borrow_mut().push(key(argv));
        true
    }
}

fn key(argv: &[&str]) -> Vec<String> {
    argv.iter().map(|s| s.to_string()).collect()
}

pub fn called_program(calls: &Rc<RefCell<Vec<Vec<String>>>>, program: &str) -> bool {
    calls
        .borrow()
        .iter()
        .any(|argv| argv.first().map(String::as_str) == Some(program))
}

/// Describe output in the submitted-changelist format, with the blank line
/// the server emits after the header.
pub fn describe_text(change: u32, file_lines: &[&str]) -> String {
    let mut out = format!(
        "Change {change} by alice@ws1 on 2024/05/01 12:00:00\n\n\tBatch work\n\nAffected files ...\n\n"
    );
    for line in file_lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    out
}

/// Print output: banner line first, content after.
pub fn print_text(path: &str, content: &str) -> String {
    format!("{path}#1 - edit change (text)\n{content}")
}
