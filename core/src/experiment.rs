use std::{env, path::PathBuf};

use anyhow::{anyhow, Result};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExperimentMode {
    Full,
    /// Short run for piloting the pipeline.
    Test,
}

impl ExperimentMode {
    pub const TEST_TRIALS_PER_SHAPE: usize = 6;

    pub fn from_str(value: &str) -> Result<Self> {
        match value {
            "full" => Ok(Self::Full),
            "test" => Ok(Self::Test),
            other => Err(anyhow!("invalid mode: {}", other)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Test => "test",
        }
    }

    /// Trials per shape for this mode, given the configured full-run count.
    pub fn trials_per_shape(&self, configured: usize) -> usize {
        match self {
            Self::Full => configured,
            Self::Test => configured.min(Self::TEST_TRIALS_PER_SHAPE),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionArgs {
    mode: ExperimentMode,
    participant_id: Option<String>,
    age: String,
    gender: String,
    output_dir: Option<PathBuf>,
    help_requested: bool,
}

impl SessionArgs {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(env::args().skip(1))
    }

    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self {
            mode: ExperimentMode::Full,
            participant_id: None,
            age: String::new(),
            gender: String::new(),
            output_dir: None,
            help_requested: false,
        };
        let mut iter = args.into_iter();

        while let Some(arg) = iter.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => {
                    (flag.to_string(), Some(value.to_string()))
                }
                _ => (arg.clone(), None),
            };

            if flag == "--help" || flag == "-h" {
                parsed.help_requested = true;
                continue;
            }

            let mut value = || -> Result<String> {
                match &inline {
                    Some(value) => Ok(value.clone()),
                    None => iter
                        .next()
                        .ok_or_else(|| anyhow!("expected value after {}", flag)),
                }
            };

            match flag.as_str() {
                "--mode" | "-m" => parsed.mode = ExperimentMode::from_str(&value()?)?,
                "--participant" | "-p" => parsed.participant_id = Some(value()?),
                "--age" => parsed.age = value()?,
                "--gender" => parsed.gender = value()?,
                "--output" | "-o" => parsed.output_dir = Some(PathBuf::from(value()?)),
                _ => return Err(anyhow!("unexpected argument: {}", arg)),
            }
        }

        Ok(parsed)
    }

    pub fn help_requested(&self) -> bool {
        self.help_requested
    }

    pub fn mode(&self) -> ExperimentMode {
        self.mode
    }

    pub fn participant_id(&self) -> Option<&str> {
        self.participant_id.as_deref()
    }

    pub fn age(&self) -> &str {
        &self.age
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }

    pub fn output_dir(&self) -> Option<&PathBuf> {
        self.output_dir.as_ref()
    }
}
