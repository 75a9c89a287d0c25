//! Line Protocol Host
//!
//! One JSON tool call per input line, one JSON tool output per output line.
//! The literal line `tools` answers with the tool manifest and blank lines
//! get no answer. A line that is not valid UTF-8 or not a valid call gets a
//! `malformed_request` output; only an I/O failure stops the loop.

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::error::ReflectionError;
use crate::tools::{ToolCall, ToolOutput, ToolRegistry};

/// Input line that requests the tool manifest
pub const MANIFEST_COMMAND: &str = "tools";

fn malformed(reason: String) -> ToolOutput {
    ToolOutput::from_error(&ReflectionError::MalformedRequest(reason))
}

/// Answer a single input line, or `None` when it is blank
pub async fn respond(registry: &ToolRegistry, line: &str) -> Result<Option<String>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    if line == MANIFEST_COMMAND {
        return Ok(Some(serde_json::to_string(&registry.manifest().await)?));
    }

    let output = match serde_json::from_str::<ToolCall>(line) {
        Ok(call) => registry.dispatch(&call).await,
        Err(e) => {
            warn!("Unparseable tool call: {}", e);
            malformed(e.to_string())
        }
    };
    Ok(Some(serde_json::to_string(&output)?))
}

/// Serve calls from `reader` until end of input, returning the number of replies
pub async fn serve<R, W>(registry: &ToolRegistry, mut reader: R, mut writer: W) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut replies = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let reply = match std::str::from_utf8(&buf) {
            Ok(line) => respond(registry, line).await?,
            Err(e) => {
                warn!("Input line is not valid UTF-8: {}", e);
                Some(serde_json::to_string(&malformed(format!("input line is not valid UTF-8: {}", e)))?)
            }
        };

        if let Some(reply) = reply {
            writer.write_all(reply.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
            replies += 1;
        }
    }

    debug!("Input closed after {} replies", replies);
    Ok(replies)
}
