use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::error::ProcessError;
use super::runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner};

/// Scripted [`ProcessRunner`] for tests: expectations are matched in
/// registration order and every call is recorded.
#[derive(Clone)]
pub struct MockProcessRunner {
    expectations: Arc<Mutex<Vec<MockExpectation>>>,
    call_history: Arc<Mutex<Vec<ProcessCommand>>>,
}

struct MockExpectation {
    program: String,
    #[allow(clippy::type_complexity)]
    args_matcher: Option<Box<dyn Fn(&[String]) -> bool + Send + Sync>>,
    response: MockResponse,
    times_called: usize,
    expected_times: Option<usize>,
}

enum MockResponse {
    Output(ProcessOutput),
    NotFound,
    TimedOut,
}

pub struct MockCommandConfig {
    runner: MockProcessRunner,
    expectation: MockExpectation,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Self {
            expectations: Arc::new(Mutex::new(Vec::new())),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn expect_command(&mut self, program: &str) -> MockCommandConfig {
        MockCommandConfig {
            runner: self.clone(),
            expectation: MockExpectation {
                program: program.to_string(),
                args_matcher: None,
                response: MockResponse::Output(ProcessOutput {
                    status: ExitStatus::Success,
                    stdout: String::new(),
                    stderr: String::new(),
                    duration: Duration::from_millis(10),
                }),
                times_called: 0,
                expected_times: None,
            },
        }
    }

    pub fn verify_called(&self, program: &str, times: usize) -> bool {
        let history = lock(&self.call_history);
        let count = history.iter().filter(|cmd| cmd.program == program).count();
        count == times
    }

    pub fn get_call_history(&self) -> Vec<ProcessCommand> {
        lock(&self.call_history).clone()
    }

    pub fn reset(&mut self) {
        lock(&self.expectations).clear();
        lock(&self.call_history).clear();
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        lock(&self.call_history).push(command.clone());

        let mut expectations = lock(&self.expectations);
        let mut exhausted = None;

        for expectation in expectations.iter_mut() {
            if expectation.program != command.program {
                continue;
            }

            if let Some(ref args_matcher) = expectation.args_matcher {
                if !(args_matcher)(&command.args) {
                    continue;
                }
            }

            // a used-up expectation yields to the next matching one
            if let Some(expected) = expectation.expected_times {
                if expectation.times_called >= expected {
                    exhausted = Some(expected);
                    continue;
                }
            }

            expectation.times_called += 1;

            return match &expectation.response {
                MockResponse::Output(output) => Ok(output.clone()),
                MockResponse::NotFound => Err(ProcessError::CommandNotFound(command.program)),
                MockResponse::TimedOut => Err(ProcessError::Timeout(
                    command.timeout.unwrap_or_default(),
                )),
            };
        }

        Err(ProcessError::MockExpectationNotMet(match exhausted {
            Some(expected) => format!(
                "Command '{}' called more than {} times",
                command.program, expected
            ),
            None => format!(
                "No expectation found for command: {} {:?}",
                command.program, command.args
            ),
        }))
    }
}

impl MockCommandConfig {
    pub fn with_args<F>(mut self, matcher: F) -> Self
    where
        F: Fn(&[String]) -> bool + Send + Sync + 'static,
    {
        self.expectation.args_matcher = Some(Box::new(matcher));
        self
    }

    pub fn returns_stdout(mut self, stdout: &str) -> Self {
        if let MockResponse::Output(ref mut output) = self.expectation.response {
            output.stdout = stdout.to_string();
        }
        self
    }

    pub fn returns_stderr(mut self, stderr: &str) -> Self {
        if let MockResponse::Output(ref mut output) = self.expectation.response {
            output.stderr = stderr.to_string();
        }
        self
    }

    pub fn returns_exit_code(mut self, code: i32) -> Self {
        if let MockResponse::Output(ref mut output) = self.expectation.response {
            output.status = if code == 0 {
                ExitStatus::Success
            } else {
                ExitStatus::Error(code)
            };
        }
        self
    }

    pub fn returns_success(self) -> Self {
        self.returns_exit_code(0)
    }

    /// Simulate the program missing from PATH
    pub fn returns_not_found(mut self) -> Self {
        self.expectation.response = MockResponse::NotFound;
        self
    }

    /// Simulate the command outliving its timeout
    pub fn returns_timeout(mut self) -> Self {
        self.expectation.response = MockResponse::TimedOut;
        self
    }

    pub fn times(mut self, n: usize) -> Self {
        self.expectation.expected_times = Some(n);
        self
    }

    pub fn finish(self) {
        lock(&self.runner.expectations).push(self.expectation);
    }
}

impl Default for MockProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}
