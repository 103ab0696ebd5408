use async_trait::async_trait;
use clap::Parser;
use env_logger::Env;
use log::*;
use std::sync::Arc;
use tokio::sync::Mutex;

use smpp_esme::data_coding::DeliveredText;
use smpp_esme::esme::{
    ClientEngine, Esme, EsmeConfig, EsmeEvents, SubmitFields,
};
use smpp_esme::receipt::DeliveryReport;
use smpp_esme::session_store::{InMemorySessionStore, SessionStore};

/// Demo sink: submits one message per bind and prints what comes back.
struct DemoEvents;

#[async_trait]
impl EsmeEvents for DemoEvents {
    async fn on_connect(&self, engine: Arc<Mutex<ClientEngine>>) {
        let result = engine
            .lock()
            .await
            .submit_sm(SubmitFields {
                source_addr: String::from("smppesme"),
                destination_addr: String::from("447000123123"),
                short_message: b"Hello from smpp-esme".to_vec(),
                data_coding: 1,
                ..SubmitFields::default()
            })
            .await;
        match result {
            Ok(seq) => info!("Submitted demo message, sequence {}", seq),
            Err(e) => error!("Demo submit failed: {}", e),
        }
    }

    async fn on_deliver_sm(
        &self,
        destination_addr: String,
        source_addr: String,
        short_message: DeliveredText,
    ) {
        info!(
            "Delivery {} -> {}: {:?}",
            source_addr, destination_addr, short_message
        );
    }

    async fn on_delivery_report(
        &self,
        _destination_addr: String,
        _source_addr: String,
        report: DeliveryReport,
    ) {
        info!("Receipt for {}: {}", report.id, report.stat);
    }
}

#[tokio::main]
async fn main() {
    let config = EsmeConfig::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .init();

    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());

    match Esme::start(config, DemoEvents, store).await {
        Ok(esme) => {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            esme.stop().await;
            info!("Done");
        }
        Err(e) => error!("Error launching: {}", e),
    }
}
