// ABOUTME: Append-only error journal recording each failed action with its debug detail
// ABOUTME: Complements the tracing log file with one self-contained block per failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

use crate::session::FailureReport;

const SEPARATOR_WIDTH: usize = 50;

/// Journal file receiving one block per failure
///
/// Each block looks like:
///
/// ```text
///
/// [2025-06-01 12:00:00] 计划生成错误: <message>
/// 堆栈跟踪: <error chain>
/// --------------------------------------------------
/// ```
#[derive(Debug, Clone)]
pub struct ErrorJournal {
    path: PathBuf,
}

impl ErrorJournal {
    /// Journal appending to `path`; the file is created on first write
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Journal location
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a failure block
    ///
    /// Write failures are logged and otherwise ignored; losing a journal entry
    /// must never turn into a second user-facing error.
    pub async fn record(&self, report: &FailureReport) {
        match self.try_record(report).await {
            Ok(()) => debug!(path = %self.path.display(), "Failure journaled"),
            Err(e) => error!(
                path = %self.path.display(),
                error = %e,
                "写入日志文件失败"
            ),
        }
    }

    async fn try_record(&self, report: &FailureReport) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        let block = format!(
            "\n[{}] {}错误: {}\n堆栈跟踪: {}\n{}\n",
            report.timestamp_label(),
            report.stage,
            report.message,
            report.debug_detail,
            "-".repeat(SEPARATOR_WIDTH)
        );
        file.write_all(block.as_bytes()).await?;
        file.flush().await
    }
}
