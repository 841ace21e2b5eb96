use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::{
    domain::{NavigationEvent, TabId},
    icon::IconSet,
};

/// The browser refuses native-messaging frames above 1 MiB, so anything larger
/// on our side is a protocol violation.
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("host channel io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("undecodable host frame: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("host frame of {len} bytes exceeds the {MAX_FRAME_LEN} byte limit")]
    FrameTooLarge { len: usize },
}

/// Events the extension forwards from the browser.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostEvent {
    /// Top-level document request; triggers a classification.
    Navigation(NavigationEvent),
    TabActivated {
        #[serde(rename = "tabId")]
        tab_id: TabId,
    },
    TabRemoved {
        #[serde(rename = "tabId")]
        tab_id: TabId,
    },
}

/// Commands sent back to the extension.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostCommand {
    /// Mirrors `browserAction.setIcon({path})` on the extension side.
    SetIcon { path: IconSet },
}

/// Reads one length-prefixed frame. `Ok(None)` means the browser closed the
/// channel at a frame boundary; EOF inside a frame is an error.
pub async fn read_event<R>(reader: &mut R) -> Result<Option<HostEvent>, CodecError>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return Err(err.into()),
    }

    let len = u32::from_le_bytes(len_buf) as usize;
    if len > MAX_FRAME_LEN {
        return Err(CodecError::FrameTooLarge { len });
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(Some(serde_json::from_slice(&payload)?))
}

pub async fn write_command<W>(writer: &mut W, command: &HostCommand) -> Result<(), CodecError>
where
    W: AsyncWrite + Unpin,
{
    let payload = serde_json::to_vec(command)?;
    if payload.len() > MAX_FRAME_LEN {
        return Err(CodecError::FrameTooLarge { len: payload.len() });
    }

    writer.write_all(&(payload.len() as u32).to_le_bytes()).await?;
    writer.write_all(&payload).await?;
    writer.flush().await?;
    Ok(())
}
