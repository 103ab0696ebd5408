use async_trait::async_trait;
use log::*;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::data_coding::DeliveredText;
use crate::esme::engine::ClientEngine;
use crate::pdu::{CommandId, CommandStatus};
use crate::receipt::DeliveryReport;

/// Where a send failed before reaching the SMSC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendFailureKind {
    /// The PDU could not be encoded (bad field content).
    Encode,
    /// The socket write failed.
    Transport,
}

/// Everything the engine reports to its host. Implementations use
/// interior mutability; methods are called from the connection's
/// dispatch task with the engine lock released, so a handler may call
/// straight back into the engine (e.g. submit from `on_connect`).
/// Handlers must not block the task.
///
/// Every method has a do-nothing default, so a host implements only
/// what it consumes.
#[async_trait]
pub trait EsmeEvents: Send + Sync {
    /// The bind was accepted; the session can now transmit.
    async fn on_connect(&self, engine: Arc<Mutex<ClientEngine>>) {
        let _ = engine;
        debug!("on_connect");
    }

    /// The connection died (or was closed); the supervisor will
    /// reconnect unless stopped.
    async fn on_disconnect(&self) {
        debug!("on_disconnect");
    }

    async fn on_submit_sm_resp(
        &self,
        sequence_number: u32,
        command_status: CommandStatus,
        command_id: CommandId,
        message_id: Option<String>,
    ) {
        debug!(
            "on_submit_sm_resp seq={} status={:?} command={} message_id={:?}",
            sequence_number, command_status, command_id, message_id
        );
    }

    async fn on_delivery_report(
        &self,
        destination_addr: String,
        source_addr: String,
        report: DeliveryReport,
    ) {
        debug!(
            "on_delivery_report dst={} src={} report={:?}",
            destination_addr, source_addr, report
        );
    }

    async fn on_deliver_sm(
        &self,
        destination_addr: String,
        source_addr: String,
        short_message: DeliveredText,
    ) {
        debug!(
            "on_deliver_sm dst={} src={} message={:?}",
            destination_addr, source_addr, short_message
        );
    }

    async fn on_send_failure(&self, kind: SendFailureKind, detail: String) {
        warn!("on_send_failure kind={:?}: {}", kind, detail);
    }
}

/// Sink that ignores everything; the default handlers' logging still
/// runs. Handy when only fault handlers are of interest.
pub struct NullEvents;

#[async_trait]
impl EsmeEvents for NullEvents {}
