//! External video transformation
//!
//! Videos are handed to a user-supplied command template such as
//! `ffmpeg -i {0} -s 640x480 {1}` where `{0}` is the source path and `{1}`
//! the output path. The template is split into arguments (double quotes
//! group words) and run directly, without a shell. The run counts as a
//! success when the output file exists and is non-empty; the exit status
//! alone is not trusted.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};
use uuid::Uuid;

use albumsync_core::config::{VIDEO_INPUT_PLACEHOLDER, VIDEO_OUTPUT_PLACEHOLDER};

use super::TransformError;

/// Prefix of the temporary transformed file written next to the source
pub const TRANSFORMED_PREFIX: &str = "albumsync_resized_";

/// A parsed video command template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCommand {
    program: String,
    args: Vec<String>,
}

impl VideoCommand {
    /// Splits a command template into program and arguments.
    ///
    /// # Errors
    /// Returns [`TransformError::EmptyCommand`] when the template has no words.
    pub fn parse(template: &str) -> Result<Self, TransformError> {
        let mut words = split_words(template).into_iter();
        let program = words.next().ok_or(TransformError::EmptyCommand)?;
        Ok(Self {
            program,
            args: words.collect(),
        })
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments with the placeholders replaced by `input` and `output`.
    ///
    /// Paths are spliced in as OS strings, so non-UTF-8 paths pass through
    /// unchanged.
    #[must_use]
    pub fn render_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        self.args
            .iter()
            .map(|arg| splice_paths(arg, input.as_os_str(), output.as_os_str()))
            .collect()
    }
}

fn splice_paths(arg: &str, input: &OsStr, output: &OsStr) -> OsString {
    let mut rendered = OsString::new();
    let mut rest = arg;
    loop {
        let next = [
            (VIDEO_INPUT_PLACEHOLDER, input),
            (VIDEO_OUTPUT_PLACEHOLDER, output),
        ]
        .into_iter()
        .filter_map(|(placeholder, path)| rest.find(placeholder).map(|at| (at, placeholder, path)))
        .min_by_key(|(at, _, _)| *at);

        match next {
            Some((at, placeholder, path)) => {
                rendered.push(&rest[..at]);
                rendered.push(path);
                rest = &rest[at + placeholder.len()..];
            }
            None => {
                rendered.push(rest);
                return rendered;
            }
        }
    }
}

fn split_words(template: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_word = false;

    for c in template.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_word = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_word {
                    words.push(std::mem::take(&mut current));
                    has_word = false;
                }
            }
            c => {
                current.push(c);
                has_word = true;
            }
        }
    }
    if has_word {
        words.push(current);
    }
    words
}

/// Where the transformed copy of `source` is written
#[must_use]
pub fn transformed_path(source: &Path) -> PathBuf {
    let mut name = OsString::from(format!("{TRANSFORMED_PREFIX}{}_", Uuid::new_v4().simple()));
    if let Some(file_name) = source.file_name() {
        name.push(file_name);
    }
    source.with_file_name(name)
}

/// Runs `command` on `source` and returns the path of the transformed file.
///
/// The caller owns the returned file and is expected to delete it.
///
/// # Errors
/// - [`TransformError::VideoCommandFailed`] if the program cannot be started
/// - [`TransformError::VideoOutputMissing`] if no non-empty output was written
#[tracing::instrument(skip(command), fields(program = command.program()))]
pub async fn transform(source: &Path, command: &VideoCommand) -> Result<PathBuf, TransformError> {
    let output_path = transformed_path(source);
    let args = command.render_args(source, &output_path);
    debug!(output = %output_path.display(), ?args, "Running video transform");

    let result = Command::new(&command.program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .await
        .map_err(|e| TransformError::VideoCommandFailed {
            output: format!("{}: {e}", command.program),
        })?;

    let stdout = String::from_utf8_lossy(&result.stdout).into_owned();
    if !result.status.success() {
        warn!(status = %result.status, "Video transform exited unsuccessfully");
    }

    let written = tokio::fs::metadata(&output_path)
        .await
        .map(|m| m.len() > 0)
        .unwrap_or(false);
    if !written {
        if let Err(e) = tokio::fs::remove_file(&output_path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %output_path.display(), error = %e, "Failed to remove empty video output");
            }
        }
        return Err(TransformError::VideoOutputMissing { output: stdout });
    }

    Ok(output_path)
}
