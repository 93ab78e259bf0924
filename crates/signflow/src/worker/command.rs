use crate::config::WorkerSettings;

/// The command line of a signing worker and how to recognise one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    interpreter: Option<String>,
    entry_point: String,
    subcommand: String,
    job_classes: Vec<String>,
    stop_after_secs: u64,
}

impl WorkerCommand {
    pub fn new(settings: &WorkerSettings) -> Self {
        Self {
            interpreter: settings.interpreter.clone(),
            entry_point: settings.entry_point.clone(),
            subcommand: settings.subcommand.clone(),
            job_classes: settings.job_classes.clone(),
            stop_after_secs: settings.stop_after_secs,
        }
    }

    pub fn job_classes(&self) -> &[String] {
        &self.job_classes
    }

    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.job_classes.len() + 4);
        if let Some(interpreter) = &self.interpreter {
            argv.push(interpreter.clone());
        }
        argv.push(self.entry_point.clone());
        argv.push(self.subcommand.clone());
        argv.extend(self.job_classes.iter().cloned());
        argv.push(format!("--stop-after={}", format_stop_after(self.stop_after_secs)));
        argv
    }

    /// True for command lines naming the entry point and at least one of
    /// the signing job classes.
    pub fn matches(&self, cmdline: &str) -> bool {
        cmdline.contains(&self.entry_point)
            && self
                .job_classes
                .iter()
                .any(|class| cmdline.contains(class.as_str()))
    }
}

fn format_stop_after(secs: u64) -> String {
    if secs > 0 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs > 0 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}
