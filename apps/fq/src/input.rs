//! Reading write input from a file or stdin.

use std::{
    io::{self, IsTerminal},
    path::Path,
};

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Read JSON input for `set`. `-` reads stdin, anything else is a file path.
pub async fn read_data(source: &Path) -> Result<Vec<u8>> {
    if source == Path::new("-") {
        let interactive = io::stdin().is_terminal();
        return read_stdin(tokio::io::stdin(), interactive).await;
    }

    if !tokio::fs::try_exists(source).await.unwrap_or(false) {
        bail!("file {} does not exist", source.display());
    }
    tokio::fs::read(source)
        .await
        .with_context(|| format!("failed to read {}", source.display()))
}

async fn read_stdin<R: AsyncRead + Unpin>(mut reader: R, interactive: bool) -> Result<Vec<u8>> {
    if interactive {
        bail!("no data from stdin");
    }
    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .await
        .context("failed to read stdin")?;
    if data.is_empty() {
        bail!("no data from stdin");
    }
    Ok(data)
}
