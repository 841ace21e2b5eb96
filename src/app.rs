use std::{sync::Arc, time::Duration};

use anyhow::Result;
use reqwest::Client;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    analysis::AnalysisClient,
    config::AppConfig,
    host::{self, HostIconSink, HostService},
    icon::IconSink,
    infrastructure::shutdown::Shutdown,
    tabs::{ResultStore, TabController},
};

pub struct PhishlightApp {
    host: HostService,
    controller: Arc<TabController>,
    writer_handle: JoinHandle<()>,
    shutdown: Shutdown,
}

impl PhishlightApp {
    pub fn initialize(config: AppConfig, shutdown: Shutdown) -> Result<Self> {
        let http = Client::builder()
            .user_agent(format!("phishlight/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        let analysis = Arc::new(AnalysisClient::new(http, config.analysis.clone()));

        let store = Arc::new(ResultStore::new());
        let (commands, command_rx) = mpsc::unbounded_channel();
        let icons: Arc<dyn IconSink> = Arc::new(HostIconSink::new(commands));
        let controller = Arc::new(TabController::new(store, icons));

        let writer_handle = tokio::spawn(host::run_command_writer(command_rx, shutdown.clone()));
        let host = HostService::new(controller.clone(), analysis);

        Ok(Self {
            host,
            controller,
            writer_handle,
            shutdown,
        })
    }

    pub async fn run(self) -> Result<()> {
        let Self {
            host,
            controller,
            mut writer_handle,
            shutdown,
        } = self;

        tracing::info!("phishlight native host started");
        let result = host.run(shutdown.subscribe()).await;

        shutdown.trigger();
        // Releasing the controller drops its sink handle so the writer can
        // drain the remaining commands and exit.
        drop(controller);

        let shutdown_timeout = Duration::from_secs(5);
        let writer_sleep = tokio::time::sleep(shutdown_timeout);
        tokio::pin!(writer_sleep);
        tokio::select! {
            res = &mut writer_handle => {
                if let Err(err) = res {
                    if err.is_panic() {
                        tracing::error!(target: "host", "command writer panicked");
                    }
                }
            }
            _ = &mut writer_sleep => {
                tracing::warn!(
                    target: "host",
                    "command writer did not stop within {:?}; aborting",
                    shutdown_timeout
                );
                writer_handle.abort();
            }
        }

        tracing::info!("phishlight host stopped");
        result
    }
}
