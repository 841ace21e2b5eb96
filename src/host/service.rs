use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{
    io::BufReader,
    sync::mpsc::{UnboundedReceiver, UnboundedSender},
};

use crate::{
    analysis::{AnalysisClient, AnalysisError},
    domain::{navigation::is_classifiable_url, NavigationEvent, TabResult},
    icon::{IconSet, IconSink},
    infrastructure::shutdown::{Shutdown, ShutdownListener},
    tabs::TabController,
};

use super::codec::{self, HostCommand, HostEvent};

/// Pushes icon updates onto the host command channel; the writer task owns the
/// stdout side.
pub struct HostIconSink {
    commands: UnboundedSender<HostCommand>,
}

impl HostIconSink {
    pub fn new(commands: UnboundedSender<HostCommand>) -> Self {
        Self { commands }
    }
}

impl IconSink for HostIconSink {
    fn show(&self, icons: IconSet) {
        let command = HostCommand::SetIcon { path: icons };
        if self.commands.send(command).is_err() {
            tracing::warn!(target: "host", "command channel closed; icon update dropped");
        }
    }
}

pub struct HostService {
    controller: Arc<TabController>,
    analysis: Arc<AnalysisClient>,
}

impl HostService {
    pub fn new(controller: Arc<TabController>, analysis: Arc<AnalysisClient>) -> Self {
        Self {
            controller,
            analysis,
        }
    }

    /// Reads host events from stdin until the browser disconnects or shutdown
    /// is requested. A frame we cannot decode is fatal: the channel is out of
    /// sync and there is no way to resynchronize it.
    pub async fn run(self, mut shutdown: ShutdownListener) -> Result<()> {
        let mut reader = BufReader::new(tokio::io::stdin());
        loop {
            let event = tokio::select! {
                _ = shutdown.notified() => break,
                event = codec::read_event(&mut reader) => event,
            };

            match event {
                Ok(Some(event)) => self.dispatch(event),
                Ok(None) => {
                    tracing::info!(target: "host", "browser closed the channel");
                    break;
                }
                Err(err) => return Err(err).context("failed to read host event"),
            }
        }
        Ok(())
    }

    fn dispatch(&self, event: HostEvent) {
        match event {
            HostEvent::Navigation(navigation) => self.classify(navigation),
            HostEvent::TabActivated { tab_id } => {
                tracing::info!(target: "host", tab = %tab_id, "tab activated");
                self.controller.handle_tab_activated(tab_id);
            }
            HostEvent::TabRemoved { tab_id } => {
                tracing::info!(target: "host", tab = %tab_id, "tab removed");
                self.controller.handle_tab_removed(tab_id);
            }
        }
    }

    /// Issues the classification request without blocking the event loop; the
    /// response is reconciled whenever it lands.
    fn classify(&self, event: NavigationEvent) {
        if !is_classifiable_url(&event.url) {
            tracing::debug!(target: "analysis", url = %event.url, "skipping non-web url");
            return;
        }

        let NavigationEvent { url, tab_id } = event;
        self.controller.handle_navigation_started(tab_id);
        tracing::info!(
            target: "analysis",
            url = %url,
            tab = %tab_id,
            "sending url to analysis server"
        );

        let analysis = self.analysis.clone();
        let controller = self.controller.clone();
        tokio::spawn(async move {
            match analysis.classify(&url).await {
                Ok(classification) => {
                    tracing::info!(
                        target: "analysis",
                        tab = %tab_id,
                        score = classification.score,
                        light = ?classification.light,
                        "received analysis result"
                    );
                    controller.handle_classification(tab_id, TabResult::Classified(classification));
                }
                Err(AnalysisError::Malformed(detail)) => {
                    tracing::warn!(
                        target: "analysis",
                        tab = %tab_id,
                        detail = %detail,
                        "server reply carried no verdict"
                    );
                    controller.handle_classification(tab_id, TabResult::Inconclusive);
                }
                Err(err) => {
                    tracing::warn!(
                        target: "analysis",
                        tab = %tab_id,
                        error = %err,
                        "analysis request failed"
                    );
                    controller.handle_classification_failed(tab_id);
                }
            }
        });
    }
}

/// Drains icon commands to stdout. Runs until every sink handle is gone; a
/// write failure means the browser side is dead, so it triggers shutdown.
pub async fn run_command_writer(mut commands: UnboundedReceiver<HostCommand>, shutdown: Shutdown) {
    let mut stdout = tokio::io::stdout();
    while let Some(command) = commands.recv().await {
        if let Err(err) = codec::write_command(&mut stdout, &command).await {
            tracing::error!(target: "host", error = %err, "failed to write host command");
            shutdown.trigger();
            break;
        }
    }
}
