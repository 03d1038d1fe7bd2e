use super::consts::{
    LOG_ARCHIVE_SUFFIX, LOG_FILE_BASE_ROLLS, LOG_FILE_MAX_ROLLS, LOG_FILE_MAX_SIZE, LOG_LINE_PATTERN, LOG_LINE_PATTERN_COLORED,
};
use ::log::LevelFilter;
use log4rs::{
    append::{
        Append,
        console::ConsoleAppender,
        rolling_file::{
            RollingFileAppender,
            policy::compound::{CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger},
        },
    },
    config::Appender,
    encode::pattern::PatternEncoder,
    filter::{Filter, threshold::ThresholdFilter},
};
use std::path::PathBuf;

pub(super) struct AppenderSpec {
    pub name: &'static str,
    level: Option<LevelFilter>,
    append: Option<Box<dyn Append>>,
}

impl AppenderSpec {
    pub fn console(name: &'static str, level: Option<LevelFilter>) -> Self {
        Self::new(
            name,
            level,
            Box::new(ConsoleAppender::builder().encoder(Box::new(PatternEncoder::new(LOG_LINE_PATTERN_COLORED))).build()),
        )
    }

    /// Builds a size-triggered rolling file appender, or `None` if the log directory cannot be used
    pub fn roller(name: &'static str, level: Option<LevelFilter>, log_dir: &str, file_name: &str) -> Option<Self> {
        let trigger = Box::new(SizeTrigger::new(LOG_FILE_MAX_SIZE));

        let file_path = PathBuf::from(log_dir).join(file_name);
        let roller_pattern = PathBuf::from(log_dir).join(format!("{}{}", file_name, LOG_ARCHIVE_SUFFIX));
        let roller = match FixedWindowRoller::builder().base(LOG_FILE_BASE_ROLLS).build(roller_pattern.to_str()?, LOG_FILE_MAX_ROLLS)
        {
            Ok(roller) => Box::new(roller),
            Err(err) => {
                eprintln!("Cannot build log roller for {}: {}", file_name, err);
                return None;
            }
        };

        let compound_policy = Box::new(CompoundPolicy::new(trigger, roller));
        match RollingFileAppender::builder().encoder(Box::new(PatternEncoder::new(LOG_LINE_PATTERN))).build(file_path, compound_policy) {
            Ok(file_appender) => Some(Self::new(name, level, Box::new(file_appender))),
            Err(err) => {
                eprintln!("Cannot open log file {} in {}: {}", file_name, log_dir, err);
                None
            }
        }
    }

    pub fn new(name: &'static str, level: Option<LevelFilter>, append: Box<dyn Append>) -> Self {
        Self { name, level, append: Some(append) }
    }

    /// Consumes the inner appender; returns `None` on any later call
    pub fn appender(&mut self) -> Option<Appender> {
        let append = self.append.take()?;
        Some(Appender::builder().filters(self.level.map(|x| Box::new(ThresholdFilter::new(x)) as Box<dyn Filter>)).build(self.name, append))
    }
}
