//! Textual command language.
//!
//! One command per line:
//! ```text
//! load <path> <name>
//! save <path> <name>
//! <op> [args...] <src> <dest> [split <percent>]
//! rgb-split <src> <red> <green> <blue>
//! rgb-combine <dest> <red> <green> <blue>
//! compare <left> <right> <percent> <dest>
//! run <script>
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use rastra_core::{ComponentKind, Operation};

use crate::error::CommandError;

/// Keyword that introduces a split-preview percentage.
const SPLIT_KEYWORD: &str = "split";

/// What a command name maps to, before arguments are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Load,
    Save,
    RgbSplit,
    RgbCombine,
    Compare,
    Run,
    Transform(TransformKind),
}

/// Single-image transforms; each maps onto one [`Operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    VerticalFlip,
    HorizontalFlip,
    Brighten,
    Darken,
    Blur,
    Sharpen,
    Sepia,
    Component(ComponentKind),
    Histogram,
    ColorCorrect,
    LevelsAdjust,
    Compress,
    Trim,
    Downscale,
}

/// One row of the command table.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    /// Required positional arguments, not counting `split <percent>`.
    pub arity: usize,
    pub kind: CommandKind,
}

impl CommandSpec {
    /// Transforms take `src dest` last and may be followed by a split.
    pub const fn is_transform(&self) -> bool {
        matches!(self.kind, CommandKind::Transform(_))
    }
}

const fn spec(name: &'static str, arity: usize, kind: CommandKind) -> CommandSpec {
    CommandSpec { name, arity, kind }
}

const fn transform(kind: TransformKind) -> CommandKind {
    CommandKind::Transform(kind)
}

/// Every command the language knows.
pub const COMMANDS: &[CommandSpec] = &[
    spec("load", 2, CommandKind::Load),
    spec("save", 2, CommandKind::Save),
    spec("rgb-split", 4, CommandKind::RgbSplit),
    spec("rgb-combine", 4, CommandKind::RgbCombine),
    spec("compare", 4, CommandKind::Compare),
    spec("run", 1, CommandKind::Run),
    spec("vertical-flip", 2, transform(TransformKind::VerticalFlip)),
    spec("horizontal-flip", 2, transform(TransformKind::HorizontalFlip)),
    spec("brighten", 3, transform(TransformKind::Brighten)),
    spec("darken", 3, transform(TransformKind::Darken)),
    spec("blur", 2, transform(TransformKind::Blur)),
    spec("sharpen", 2, transform(TransformKind::Sharpen)),
    spec("sepia", 2, transform(TransformKind::Sepia)),
    spec("red-component", 2, transform(TransformKind::Component(ComponentKind::Red))),
    spec("green-component", 2, transform(TransformKind::Component(ComponentKind::Green))),
    spec("blue-component", 2, transform(TransformKind::Component(ComponentKind::Blue))),
    spec("value-component", 2, transform(TransformKind::Component(ComponentKind::Value))),
    spec("intensity-component", 2, transform(TransformKind::Component(ComponentKind::Intensity))),
    spec("luma-component", 2, transform(TransformKind::Component(ComponentKind::Luma))),
    spec("histogram", 2, transform(TransformKind::Histogram)),
    spec("color-correct", 2, transform(TransformKind::ColorCorrect)),
    spec("levels-adjust", 5, transform(TransformKind::LevelsAdjust)),
    spec("compress", 3, transform(TransformKind::Compress)),
    spec("trim", 4, transform(TransformKind::Trim)),
    spec("downscale", 4, transform(TransformKind::Downscale)),
];

/// Look up a command by name.
pub fn lookup(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == name)
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Load {
        path: PathBuf,
        name: String,
    },
    Save {
        path: PathBuf,
        name: String,
    },
    Transform {
        op: Operation,
        src: String,
        dest: String,
        split: Option<f64>,
    },
    RgbSplit {
        src: String,
        red: String,
        green: String,
        blue: String,
    },
    RgbCombine {
        dest: String,
        red: String,
        green: String,
        blue: String,
    },
    Compare {
        left: String,
        right: String,
        percent: f64,
        dest: String,
    },
    Run {
        path: PathBuf,
    },
}

impl Command {
    /// Parse one line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (name, mut args) = (tokens[0], &tokens[1..]);
        let spec = lookup(name).ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;

        let mut split = None;
        if spec.is_transform()
            && args.len() == spec.arity + 2
            && args[spec.arity] == SPLIT_KEYWORD
        {
            split = Some(number("split percentage", args[spec.arity + 1])?);
            args = &args[..spec.arity];
        }
        if args.len() != spec.arity {
            return Err(CommandError::Arity {
                command: spec.name,
                expected: spec.arity,
                found: args.len(),
            });
        }

        let owned = |i: usize| args[i].to_string();
        let command = match spec.kind {
            CommandKind::Load => Self::Load {
                path: args[0].into(),
                name: owned(1),
            },
            CommandKind::Save => Self::Save {
                path: args[0].into(),
                name: owned(1),
            },
            CommandKind::RgbSplit => Self::RgbSplit {
                src: owned(0),
                red: owned(1),
                green: owned(2),
                blue: owned(3),
            },
            CommandKind::RgbCombine => Self::RgbCombine {
                dest: owned(0),
                red: owned(1),
                green: owned(2),
                blue: owned(3),
            },
            CommandKind::Compare => Self::Compare {
                left: owned(0),
                right: owned(1),
                percent: number("compare percentage", args[2])?,
                dest: owned(3),
            },
            CommandKind::Run => Self::Run {
                path: args[0].into(),
            },
            CommandKind::Transform(kind) => {
                let params = &args[..spec.arity - 2];
                Self::Transform {
                    op: operation(kind, params)?,
                    src: owned(spec.arity - 2),
                    dest: owned(spec.arity - 1),
                    split,
                }
            }
        };
        Ok(Some(command))
    }
}

/// Build the core operation for a transform command from its parameters.
fn operation(kind: TransformKind, params: &[&str]) -> Result<Operation, CommandError> {
    Ok(match kind {
        TransformKind::VerticalFlip => Operation::FlipVertical,
        TransformKind::HorizontalFlip => Operation::FlipHorizontal,
        TransformKind::Brighten => Operation::Brighten(number("brighten amount", params[0])?),
        TransformKind::Darken => Operation::Darken(number("darken amount", params[0])?),
        TransformKind::Blur => Operation::Blur,
        TransformKind::Sharpen => Operation::Sharpen,
        TransformKind::Sepia => Operation::Sepia,
        TransformKind::Component(component) => Operation::Component(component),
        TransformKind::Histogram => Operation::Histogram,
        TransformKind::ColorCorrect => Operation::ColorCorrect,
        TransformKind::LevelsAdjust => Operation::LevelsAdjust {
            black: number("black point", params[0])?,
            mid: number("mid point", params[1])?,
            white: number("white point", params[2])?,
        },
        TransformKind::Compress => Operation::Compress(number("compression ratio", params[0])?),
        TransformKind::Trim => Operation::Trim {
            start: number("trim start", params[0])?,
            end: number("trim end", params[1])?,
        },
        TransformKind::Downscale => Operation::Downscale {
            width: number("width", params[0])?,
            height: number("height", params[1])?,
        },
    })
}

fn number<T: FromStr>(what: &'static str, token: &str) -> Result<T, CommandError> {
    token.parse().map_err(|_| CommandError::BadNumber {
        what,
        value: token.to_string(),
    })
}
