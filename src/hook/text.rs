use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::logger::FileLogger;
use crate::metric::{display_value, format_eta, keys, round_floats, MetricSnapshot};
use crate::{Collective, LearningRate, Mode, RunContext};

/// Decimal places kept by the JSON records.
const JSON_NDIGITS: i32 = 5;

/// Configuration for [`TextLoggerHook`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLoggerConfig {
    /// Display epoch plus within-epoch iteration instead of a flat
    /// iteration count. Default: true.
    pub by_epoch: bool,
    /// Logging interval in iterations, even when `by_epoch` is true.
    /// Default: 10.
    pub interval: usize,
    /// Whether the driving scheduler suppresses a final partial interval
    /// shorter than `interval`. Default: true.
    pub ignore_last: bool,
    /// Whether the owner of the metric buffer clears it after each tick.
    /// Default: false.
    pub reset_flag: bool,
    /// Log destination, overriding the run's working directory.
    pub out_dir: Option<PathBuf>,
}

impl Default for TextLoggerConfig {
    fn default() -> Self {
        Self {
            by_epoch: true,
            interval: 10,
            ignore_last: true,
            reset_flag: false,
            out_dir: None,
        }
    }
}

impl TextLoggerConfig {
    /// Display a flat iteration count instead of epoch plus within-epoch
    /// iteration.
    pub fn with_by_epoch(mut self, by_epoch: bool) -> Self {
        self.by_epoch = by_epoch;
        self
    }

    /// Set the logging interval in iterations.
    pub fn with_interval(mut self, interval: usize) -> Self {
        self.interval = interval;
        self
    }

    /// Set whether a final partial interval is suppressed.
    pub fn with_ignore_last(mut self, ignore_last: bool) -> Self {
        self.ignore_last = ignore_last;
        self
    }

    /// Set whether the metric buffer is cleared after each tick.
    pub fn with_reset_flag(mut self, reset_flag: bool) -> Self {
        self.reset_flag = reset_flag;
        self
    }

    /// Override the run's working directory as the log destination.
    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(out_dir.into());
        self
    }

    /// Create the hook driven by this configuration.
    pub fn init(&self, collective: Box<dyn Collective>) -> TextLoggerHook {
        TextLoggerHook::new(self.clone(), collective)
    }
}

/// Logging hook that turns each tick into one human-readable text line and
/// one JSON record.
///
/// The text line goes through the [`log`] facade; the JSON record is
/// appended to `<out_dir>/<timestamp>.log.json`, one object per line with
/// floats rounded to 5 decimal places. In a multi-process run every process
/// computes the snapshot, but only the designated writer emits output.
#[derive(new)]
pub struct TextLoggerHook {
    config: TextLoggerConfig,
    collective: Box<dyn Collective>,
    #[new(default)]
    time_sec_tot: f64,
    #[new(default)]
    start_iter: usize,
    #[new(default)]
    json_log_path: Option<PathBuf>,
    #[new(default)]
    json_logger: Option<FileLogger>,
}

impl TextLoggerHook {
    /// The configuration the hook was built with, for the scheduler that
    /// drives it.
    pub fn config(&self) -> &TextLoggerConfig {
        &self.config
    }

    /// Path of the JSON log file, fixed by [`Self::before_run`].
    pub fn json_log_path(&self) -> Option<&Path> {
        self.json_log_path.as_deref()
    }

    /// Resolve the log destination and fix the JSON log path for the run.
    ///
    /// Creates the output directory on the designated writer, records the
    /// starting iteration, and writes the run metadata as the first JSON
    /// record when the run supplies some.
    pub fn before_run(&mut self, ctx: &dyn RunContext) -> io::Result<()> {
        let out_dir = self
            .config
            .out_dir
            .clone()
            .unwrap_or_else(|| ctx.work_dir().to_path_buf());

        if self.collective.is_main() {
            fs::create_dir_all(&out_dir)?;
        }
        log::info!("Text logs will be saved to {}", out_dir.display());

        self.start_iter = ctx.iter();
        self.json_log_path = Some(out_dir.join(format!("{}.log.json", ctx.timestamp())));

        if let Some(meta) = ctx.meta() {
            self.append_json(meta)?;
        }
        Ok(())
    }

    /// Run one logging tick, returning the snapshot written to both sinks.
    pub fn log(&mut self, ctx: &dyn RunContext) -> io::Result<MetricSnapshot> {
        let snapshot = self.build_snapshot(ctx);

        let line = self.render_text(&snapshot, ctx);
        if self.collective.is_main() {
            log::info!("{line}");
        }

        self.append_json(&snapshot)?;
        Ok(snapshot)
    }

    fn build_snapshot(&self, ctx: &dyn RunContext) -> MetricSnapshot {
        let mut snapshot = MetricSnapshot::new();
        snapshot.insert(keys::MODE.to_owned(), Value::from(ctx.mode().as_str()));
        snapshot.insert(keys::EPOCH.to_owned(), Value::from(ctx.epoch() as u64));

        let cur_iter = if self.config.by_epoch {
            ctx.inner_iter()
        } else {
            ctx.iter()
        };
        snapshot.insert(keys::ITER.to_owned(), Value::from(cur_iter as u64));

        if let Some(bytes) = ctx.max_memory_allocated() {
            snapshot.insert(keys::MEMORY.to_owned(), Value::from(self.max_memory_mb(bytes)));
        }

        if ctx.mode() == Mode::Train {
            if let Some(lr) = ctx.lr() {
                snapshot.insert(keys::LR.to_owned(), lr_value(&lr));
            }
        }

        for (name, value) in ctx.buffer_output() {
            snapshot.insert(name, value);
        }

        snapshot
    }

    /// Peak memory in megabytes, max-reduced so that every process carries
    /// the cluster-wide figure.
    fn max_memory_mb(&self, bytes: u64) -> u64 {
        let local = (bytes as f64 / (1024.0 * 1024.0)).floor();
        self.collective.reduce_max(local) as u64
    }

    fn render_text(&mut self, snapshot: &MetricSnapshot, ctx: &dyn RunContext) -> String {
        // Keys consumed by the prefix and the dedicated segments, so the
        // trailing generic segment never repeats them. Scoped to this tick.
        let mut logged: HashSet<&str> = HashSet::new();
        let mut line = String::new();

        if ctx.mode() == Mode::Train {
            if self.config.by_epoch {
                line.push_str(&format!(
                    "{} [{}][{}/{}]\t",
                    keys::EPOCH,
                    snapshot[keys::EPOCH],
                    snapshot[keys::ITER],
                    ctx.iters_per_epoch()
                ));
            } else {
                line.push_str(&format!(
                    "{} [{}/{}]\t",
                    keys::ITER,
                    snapshot[keys::ITER],
                    ctx.max_iters()
                ));
            }
            logged.extend([keys::MODE, keys::ITER, keys::EPOCH]);

            match snapshot.get(keys::LR) {
                Some(Value::Object(groups)) => {
                    let lr_str = groups
                        .iter()
                        .map(|(group, value)| {
                            format!("{}_{}: {:.3e}", keys::LR, group, value.as_f64().unwrap_or_default())
                        })
                        .collect::<Vec<_>>()
                        .join(" ");
                    line.push_str(&format!("{lr_str}, "));
                    logged.insert(keys::LR);
                }
                Some(value) => {
                    line.push_str(&format!(
                        "{}: {:.3e}, ",
                        keys::LR,
                        value.as_f64().unwrap_or_default()
                    ));
                    logged.insert(keys::LR);
                }
                None => {}
            }

            if let Some(iter_time) = snapshot.get(keys::ITER_TIME).and_then(Value::as_f64) {
                self.time_sec_tot += iter_time * self.config.interval as f64;
                let time_sec_avg = self.time_sec_tot / (ctx.iter() - self.start_iter + 1) as f64;
                let eta_sec = time_sec_avg * ctx.max_iters().saturating_sub(ctx.iter() + 1) as f64;

                line.push_str(&format!("{}: {}, ", keys::ETA, format_eta(eta_sec as u64)));
                line.push_str(&format!("{}: {iter_time:.3}, ", keys::ITER_TIME));
                logged.insert(keys::ITER_TIME);

                if let Some(data_time) = snapshot.get(keys::DATA_LOAD_TIME).and_then(Value::as_f64)
                {
                    line.push_str(&format!("{}: {data_time:.3}, ", keys::DATA_LOAD_TIME));
                    logged.insert(keys::DATA_LOAD_TIME);
                }
            }
        } else {
            // Validation and test ticks show no lr or timing segments.
            if self.config.by_epoch {
                line.push_str(&format!(
                    "{}({}) [{}][{}]\t",
                    keys::EPOCH,
                    ctx.mode(),
                    snapshot[keys::EPOCH],
                    snapshot[keys::ITER]
                ));
            } else {
                line.push_str(&format!(
                    "{}({}) [{}]\t",
                    keys::ITER,
                    ctx.mode(),
                    snapshot[keys::ITER]
                ));
            }
            logged.extend([keys::MODE, keys::ITER, keys::EPOCH]);
        }

        let items = snapshot
            .iter()
            .filter(|(name, _)| !logged.contains(name.as_str()))
            .map(|(name, value)| format!("{name}: {}", display_value(value)))
            .collect::<Vec<_>>();
        line.push_str(&items.join(", "));

        line
    }

    /// Append the snapshot as one JSON line, floats rounded to 5 decimals.
    ///
    /// Non-designated processes compute the record but skip the write.
    fn append_json(&mut self, snapshot: &MetricSnapshot) -> io::Result<()> {
        let record = round_floats(&Value::Object(snapshot.clone()), JSON_NDIGITS);

        if !self.collective.is_main() {
            return Ok(());
        }

        if self.json_logger.is_none() {
            let path = self
                .json_log_path
                .as_ref()
                .expect("before_run fixes the json log path");
            self.json_logger = Some(FileLogger::new(path)?);
        }
        if let Some(logger) = self.json_logger.as_mut() {
            logger.write_line(&record.to_string())?;
        }
        Ok(())
    }
}

fn lr_value(lr: &LearningRate) -> Value {
    match lr {
        LearningRate::Value(value) => Value::from(*value),
        LearningRate::Groups(groups) => Value::Object(
            groups
                .iter()
                .map(|(group, value)| (group.clone(), Value::from(*value)))
                .collect(),
        ),
    }
}
