//! A named-image workspace that executes parsed commands.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use rastra_core::{Image, split_boundary};

use crate::command::Command;
use crate::config::CliConfig;
use crate::error::CommandError;

/// Deepest allowed chain of `run` commands.
pub const MAX_RUN_DEPTH: usize = 8;

pub struct Session {
    images: HashMap<String, Image>,
    config: CliConfig,
    depth: usize,
    failures: usize,
}

impl Session {
    pub fn new(config: CliConfig) -> Self {
        Self {
            images: HashMap::new(),
            config,
            depth: 0,
            failures: 0,
        }
    }

    /// Number of commands that have failed so far, across nested scripts.
    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn get(&self, name: &str) -> Option<&Image> {
        self.images.get(name)
    }

    /// Store `image` under `name`, replacing any previous image.
    pub fn insert(&mut self, name: impl Into<String>, image: Image) {
        self.images.insert(name.into(), image);
    }

    fn image(&self, name: &str) -> Result<&Image, CommandError> {
        self.images
            .get(name)
            .ok_or_else(|| CommandError::UnknownImage(name.to_string()))
    }

    /// Run one command against the session.
    pub fn execute(&mut self, command: Command, out: &mut dyn Write) -> Result<(), CommandError> {
        match command {
            Command::Load { path, name } => {
                let image = rastra_codec::load(&path)?;
                self.insert(name, image);
            }
            Command::Save { path, name } => {
                rastra_codec::save(&path, self.image(&name)?)?;
            }
            Command::Transform {
                op,
                src,
                dest,
                split,
            } => {
                let result = op.apply_with_preview(self.image(&src)?, split)?;
                tracing::debug!("{} {src} -> {dest}", op.label());
                self.insert(dest, result);
            }
            Command::RgbSplit {
                src,
                red,
                green,
                blue,
            } => {
                let [r, g, b] = self.image(&src)?.rgb_split();
                self.insert(red, r);
                self.insert(green, g);
                self.insert(blue, b);
            }
            Command::RgbCombine {
                dest,
                red,
                green,
                blue,
            } => {
                let combined =
                    Image::rgb_combine(self.image(&red)?, self.image(&green)?, self.image(&blue)?)?;
                self.insert(dest, combined);
            }
            Command::Compare {
                left,
                right,
                percent,
                dest,
            } => {
                let left = self.image(&left)?;
                let boundary = split_boundary(left.width(), percent)?;
                let composite = left.overlay(self.image(&right)?, boundary)?;
                self.insert(dest, composite);
            }
            Command::Run { path } => self.run_file(&path, out)?,
        }
        Ok(())
    }

    /// Open `path` and run it as a script, one level deeper.
    pub fn run_file(&mut self, path: &Path, out: &mut dyn Write) -> Result<(), CommandError> {
        if self.depth >= MAX_RUN_DEPTH {
            return Err(CommandError::RunDepth(MAX_RUN_DEPTH));
        }
        let reader = BufReader::new(File::open(path)?);
        tracing::info!("running script {}", path.display());

        self.depth += 1;
        let result = self.run_script(reader, out);
        self.depth -= 1;
        result
    }

    /// Execute every line of `input`.
    ///
    /// A failing command is reported as `error: <message>` on `out` and the
    /// script continues, unless `stop_on_error` is set, in which case this
    /// returns [`CommandError::Aborted`] after reporting.
    pub fn run_script(
        &mut self,
        input: impl BufRead,
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        for (index, line) in input.lines().enumerate() {
            let line = line?;
            let parsed = match Command::parse(&line) {
                Ok(Some(command)) => Ok(command),
                Ok(None) => continue,
                Err(e) => Err(e),
            };
            if self.config.echo_commands {
                writeln!(out, "> {}", line.trim())?;
            }

            match parsed.and_then(|command| self.execute(command, out)) {
                Ok(()) => {}
                // Already reported by the nested script that failed.
                Err(CommandError::Aborted) => return Err(CommandError::Aborted),
                Err(e) => {
                    self.failures += 1;
                    tracing::warn!("line {}: {e}", index + 1);
                    writeln!(out, "error: {e}")?;
                    if self.config.stop_on_error {
                        return Err(CommandError::Aborted);
                    }
                }
            }
        }
        Ok(())
    }
}
