#![allow(dead_code)]

pub struct RunResult {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

pub fn run_cli(args: &[&str]) -> RunResult {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let argv: Vec<&str> = std::iter::once("besigue").chain(args.iter().copied()).collect();
    let code = besigue_cli::run(argv, &mut out, &mut err);
    RunResult {
        code,
        stdout: String::from_utf8(out).expect("utf8 stdout"),
        stderr: String::from_utf8(err).expect("utf8 stderr"),
    }
}

/// Sets environment variables for the guard's lifetime. Tests using it must
/// be `#[serial]`.
pub struct EnvGuard {
    restores: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub fn apply(pairs: &[(&str, Option<&str>)]) -> Self {
        let mut restores = Vec::new();
        for (key, value) in pairs {
            restores.push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                match value {
                    Some(v) => std::env::set_var(key, v),
                    None => std::env::remove_var(key),
                }
            }
        }
        EnvGuard { restores }
    }

    /// Clears every `BESIGUE_*` variable, then applies `pairs`.
    pub fn clean(pairs: &[(&str, &str)]) -> Self {
        let mut all: Vec<(&str, Option<&str>)> = [
            "BESIGUE_CONFIG",
            "BESIGUE_SEED",
            "BESIGUE_PLAYERS",
            "BESIGUE_WINNING_SCORE",
            "BESIGUE_DEALER",
            "BESIGUE_AI",
        ]
        .into_iter()
        .map(|k| (k, None))
        .collect();
        all.extend(pairs.iter().map(|(k, v)| (*k, Some(*v))));
        Self::apply(&all)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, previous) in self.restores.iter().rev() {
            unsafe {
                match previous {
                    Some(val) => std::env::set_var(key, val),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}
