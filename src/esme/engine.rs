use log::*;
use std::fmt::{Display, Formatter};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, WriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{watch, Mutex};

use crate::data_coding::decode_short_message;
use crate::esme::connection_state::ConnectionState;
use crate::esme::esme_config::EsmeConfig;
use crate::esme::esme_events::{EsmeEvents, SendFailureKind};
use crate::esme::fault::{FaultClass, FaultHandler, FaultHandlers};
use crate::framer::{FrameError, Framer};
use crate::multipart::{detect_multipart, MultipartAssembly};
use crate::pdu::{
    BindTransceiverBody, CommandId, CommandStatus, DeliverSmRespBody,
    DestAddress, Pdu, PduBody, PduError, QuerySmBody, SmBody,
    SubmitMultiBody, Tlv,
};
use crate::receipt::parse_delivery_report;
use crate::sequence::SequenceAllocator;
use crate::session_store::{SessionKeys, SessionStore};

/// Anything that kills a connection or fails a send.
#[derive(Debug)]
pub enum EngineError {
    Frame(FrameError),
    Pdu(PduError),
    Io(io::Error),
    Store(Box<dyn std::error::Error + Send + Sync>),
}

impl Display for EngineError {
    fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
        match self {
            EngineError::Frame(e) => e.fmt(formatter),
            EngineError::Pdu(e) => e.fmt(formatter),
            EngineError::Io(e) => e.fmt(formatter),
            EngineError::Store(e) => {
                write!(formatter, "session store error: {}", e)
            }
        }
    }
}

impl std::error::Error for EngineError {}

impl From<FrameError> for EngineError {
    fn from(e: FrameError) -> Self {
        EngineError::Frame(e)
    }
}

impl From<PduError> for EngineError {
    fn from(e: PduError) -> Self {
        EngineError::Pdu(e)
    }
}

impl From<io::Error> for EngineError {
    fn from(e: io::Error) -> Self {
        EngineError::Io(e)
    }
}

/// Caller-supplied fields for submit_sm and submit_multi. Unset
/// destination TON/NPI fall back to the engine defaults from the
/// configuration; everything else defaults to zero or empty, which is
/// what the SMPP spec means by "not set".
#[derive(Clone, Debug, Default)]
pub struct SubmitFields {
    pub service_type: String,
    pub source_addr_ton: u8,
    pub source_addr_npi: u8,
    pub source_addr: String,
    pub dest_addr_ton: Option<u8>,
    pub dest_addr_npi: Option<u8>,
    pub destination_addr: String,
    pub esm_class: u8,
    pub protocol_id: u8,
    pub priority_flag: u8,
    pub schedule_delivery_time: String,
    pub validity_period: String,
    pub registered_delivery: u8,
    pub replace_if_present_flag: u8,
    pub data_coding: u8,
    pub sm_default_msg_id: u8,
    pub short_message: Vec<u8>,
    pub tlvs: Vec<Tlv>,
}

impl SubmitFields {
    fn into_sm_body(self, config: &EsmeConfig) -> SmBody {
        SmBody {
            service_type: self.service_type,
            source_addr_ton: self.source_addr_ton,
            source_addr_npi: self.source_addr_npi,
            source_addr: self.source_addr,
            dest_addr_ton: self.dest_addr_ton.unwrap_or(config.dest_addr_ton),
            dest_addr_npi: self.dest_addr_npi.unwrap_or(config.dest_addr_npi),
            destination_addr: self.destination_addr,
            esm_class: self.esm_class,
            protocol_id: self.protocol_id,
            priority_flag: self.priority_flag,
            schedule_delivery_time: self.schedule_delivery_time,
            validity_period: self.validity_period,
            registered_delivery: self.registered_delivery,
            replace_if_present_flag: self.replace_if_present_flag,
            data_coding: self.data_coding,
            sm_default_msg_id: self.sm_default_msg_id,
            short_message: self.short_message,
            tlvs: self.tlvs,
        }
    }
}

/// One submit_multi destination as supplied by the host. TON/NPI left
/// unset fall back to the engine defaults.
#[derive(Clone, Debug)]
pub enum MultiDest {
    Sme {
        destination_addr: String,
        dest_addr_ton: Option<u8>,
        dest_addr_npi: Option<u8>,
    },
    DistributionList(String),
}

impl MultiDest {
    /// Address with default TON/NPI.
    pub fn address(destination_addr: &str) -> MultiDest {
        MultiDest::Sme {
            destination_addr: String::from(destination_addr),
            dest_addr_ton: None,
            dest_addr_npi: None,
        }
    }
}

/// The protocol engine for one live connection: owns the write half,
/// the framer and the connection state, and emits/handles PDUs. The
/// supervisor rebuilds one per connection, lending it the shared
/// sequence allocator.
pub struct ClientEngine {
    config: EsmeConfig,
    keys: SessionKeys,
    state: ConnectionState,
    state_tx: watch::Sender<ConnectionState>,
    bound_once: bool,
    framer: Framer,
    seq: SequenceAllocator,
    write: Option<WriteHalf<TcpStream>>,
    store: Arc<dyn SessionStore>,
    events: Arc<dyn EsmeEvents>,
    fault_handlers: FaultHandlers,
}

impl ClientEngine {
    pub(crate) fn new(
        config: EsmeConfig,
        write: WriteHalf<TcpStream>,
        seq: SequenceAllocator,
        store: Arc<dyn SessionStore>,
        events: Arc<dyn EsmeEvents>,
        fault_handlers: FaultHandlers,
        state_tx: watch::Sender<ConnectionState>,
    ) -> ClientEngine {
        let keys =
            SessionKeys::new(&config.system_id, &config.host, config.port);
        let framer = Framer::new(config.max_pdu_len);
        ClientEngine {
            config,
            keys,
            state: ConnectionState::Closed,
            state_tx,
            bound_once: false,
            framer,
            seq,
            write: Some(write),
            store,
            events,
            fault_handlers,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn session_keys(&self) -> &SessionKeys {
        &self.keys
    }

    pub(crate) fn was_bound(&self) -> bool {
        self.bound_once
    }

    pub fn set_fault_handler(
        &mut self,
        class: FaultClass,
        handler: FaultHandler,
    ) {
        self.fault_handlers.set(class, handler);
    }

    fn set_state(&mut self, state: ConnectionState) {
        if self.state != state {
            info!("State: {:?}", state);
        }
        self.state = state;
        let _ = self.state_tx.send(state);
    }

    /// The TCP connection is up: move to OPEN and send the bind.
    pub(crate) async fn open(&mut self) -> Result<(), EngineError> {
        self.set_state(ConnectionState::Open);
        let body = BindTransceiverBody {
            system_id: self.config.system_id.clone(),
            password: self.config.password.clone(),
            system_type: self.config.system_type.clone(),
            interface_version: 0x34,
            addr_ton: self.config.addr_ton,
            addr_npi: self.config.addr_npi,
            address_range: self.config.address_range.clone(),
        };
        let sequence_number = self.seq.next();
        self.send_pdu(&Pdu::new(
            CommandStatus::ESME_ROK,
            sequence_number,
            PduBody::BindTransceiver(body),
        ))
        .await
    }

    /// Sends a submit_sm built from the engine defaults merged with
    /// `fields` and pushes one marker onto the unacked list. Returns
    /// the allocated sequence number, or 0 when not bound.
    pub async fn submit_sm(
        &mut self,
        fields: SubmitFields,
    ) -> Result<u32, EngineError> {
        if !self.state.can_transmit() {
            return Ok(0);
        }
        let sequence_number = self.seq.next();
        let body = fields.into_sm_body(&self.config);
        self.send_pdu(&Pdu::new(
            CommandStatus::ESME_ROK,
            sequence_number,
            PduBody::SubmitSm(body),
        ))
        .await?;
        let unacked = self.keys.unacked();
        self.store
            .list_push_left(&unacked, b"1")
            .await
            .map_err(EngineError::Store)?;
        if let Ok(len) = self.store.list_len(&unacked).await {
            info!("{}: {}", unacked, len);
        }
        Ok(sequence_number)
    }

    /// Sends a submit_multi to the given destinations. Does not touch
    /// the unacked list; only submit_sm is accounted there.
    pub async fn submit_multi(
        &mut self,
        dest_addresses: Vec<MultiDest>,
        fields: SubmitFields,
    ) -> Result<u32, EngineError> {
        if !self.state.can_transmit() {
            return Ok(0);
        }
        let sequence_number = self.seq.next();
        let dest_addresses = dest_addresses
            .into_iter()
            .map(|dest| match dest {
                MultiDest::Sme {
                    destination_addr,
                    dest_addr_ton,
                    dest_addr_npi,
                } => DestAddress::Sme {
                    dest_addr_ton: dest_addr_ton
                        .unwrap_or(self.config.dest_addr_ton),
                    dest_addr_npi: dest_addr_npi
                        .unwrap_or(self.config.dest_addr_npi),
                    destination_addr,
                },
                MultiDest::DistributionList(dl_name) => {
                    DestAddress::DistributionList(dl_name)
                }
            })
            .collect();
        let body = SubmitMultiBody {
            service_type: fields.service_type,
            source_addr_ton: fields.source_addr_ton,
            source_addr_npi: fields.source_addr_npi,
            source_addr: fields.source_addr,
            dest_addresses,
            esm_class: fields.esm_class,
            protocol_id: fields.protocol_id,
            priority_flag: fields.priority_flag,
            schedule_delivery_time: fields.schedule_delivery_time,
            validity_period: fields.validity_period,
            registered_delivery: fields.registered_delivery,
            replace_if_present_flag: fields.replace_if_present_flag,
            data_coding: fields.data_coding,
            sm_default_msg_id: fields.sm_default_msg_id,
            short_message: fields.short_message,
            tlvs: fields.tlvs,
        };
        self.send_pdu(&Pdu::new(
            CommandStatus::ESME_ROK,
            sequence_number,
            PduBody::SubmitMulti(body),
        ))
        .await?;
        Ok(sequence_number)
    }

    pub async fn enquire_link(&mut self) -> Result<u32, EngineError> {
        if !self.state.can_transmit() {
            return Ok(0);
        }
        let sequence_number = self.seq.next();
        self.send_pdu(&Pdu::new(
            CommandStatus::ESME_ROK,
            sequence_number,
            PduBody::EnquireLink,
        ))
        .await?;
        Ok(sequence_number)
    }

    pub async fn query_sm(
        &mut self,
        message_id: &str,
        source_addr: &str,
    ) -> Result<u32, EngineError> {
        if !self.state.can_transmit() {
            return Ok(0);
        }
        let sequence_number = self.seq.next();
        let body = QuerySmBody {
            message_id: String::from(message_id),
            source_addr_ton: 0,
            source_addr_npi: 0,
            source_addr: String::from(source_addr),
        };
        self.send_pdu(&Pdu::new(
            CommandStatus::ESME_ROK,
            sequence_number,
            PduBody::QuerySm(body),
        ))
        .await?;
        Ok(sequence_number)
    }

    /// Closes the write half and returns to CLOSED. Idempotent.
    pub(crate) async fn disconnect(&mut self) {
        self.write.take();
        self.set_state(ConnectionState::Closed);
    }

    async fn send_pdu(&mut self, pdu: &Pdu) -> Result<(), EngineError> {
        info!("=> {:?}", pdu);
        let bytes = match pdu.to_bytes() {
            Ok(bytes) => bytes,
            Err(e) => {
                self.report_send_failure(
                    SendFailureKind::Encode,
                    e.to_string(),
                );
                return Err(e.into());
            }
        };
        match &mut self.write {
            Some(write) => {
                if let Err(e) = write.write_all(&bytes).await {
                    self.report_send_failure(
                        SendFailureKind::Transport,
                        e.to_string(),
                    );
                    return Err(e.into());
                }
                Ok(())
            }
            None => {
                error!("Attempting to write to a closed connection!");
                Err(io::Error::from(io::ErrorKind::BrokenPipe).into())
            }
        }
    }

    // The sink call is spawned so that a host holding the engine lock
    // (every public send runs under it) cannot deadlock against its
    // own sink implementation.
    fn report_send_failure(&self, kind: SendFailureKind, detail: String) {
        let events = Arc::clone(&self.events);
        tokio::spawn(async move {
            events.on_send_failure(kind, detail).await;
        });
    }

    fn feed(&mut self, data: &[u8]) -> Result<Vec<Pdu>, EngineError> {
        self.framer.feed(data);
        let mut pdus = Vec::new();
        while let Some(frame) = self.framer.try_pop()? {
            pdus.push(Pdu::parse(&frame)?);
        }
        Ok(pdus)
    }

    fn handle_bind_accepted(&mut self) {
        self.bound_once = true;
        self.set_state(ConnectionState::BoundTrx);
    }

    fn context(
        &self,
    ) -> (Arc<dyn EsmeEvents>, Arc<dyn SessionStore>, SessionKeys, Duration)
    {
        (
            Arc::clone(&self.events),
            Arc::clone(&self.store),
            self.keys.clone(),
            Duration::from_secs(self.config.multipart_ttl_secs),
        )
    }
}

/// Feeds raw socket bytes to the engine and dispatches every complete
/// PDU. Engine lock is taken per step and released before any event
/// sink call, so sinks may call back into the engine.
pub async fn data_received(
    engine: &Arc<Mutex<ClientEngine>>,
    data: &[u8],
) -> Result<(), EngineError> {
    let pdus = engine.lock().await.feed(data)?;
    for pdu in pdus {
        dispatch(engine, pdu).await?;
    }
    Ok(())
}

async fn dispatch(
    engine: &Arc<Mutex<ClientEngine>>,
    pdu: Pdu,
) -> Result<(), EngineError> {
    info!("<= {:?}", pdu);
    let status = pdu.command_status;
    let sequence_number = pdu.sequence_number;
    let body = pdu.body().clone();
    {
        let e = engine.lock().await;
        let class = e.fault_handlers.dispatch(&pdu);
        if class != FaultClass::Ok {
            debug!(
                "command_status {:?} ({}) classified {:?}",
                status,
                status.description(),
                class
            );
        }
    }
    match body {
        PduBody::BindTransceiverResp(_) => {
            if status.is_ok() {
                engine.lock().await.handle_bind_accepted();
            } else {
                warn!(
                    "Bind rejected: {:?} ({})",
                    status,
                    status.description()
                );
            }
        }
        PduBody::SubmitSmResp(resp) => {
            handle_submit_sm_resp(
                engine,
                sequence_number,
                status,
                resp.message_id,
            )
            .await?;
        }
        PduBody::SubmitMultiResp(_) => {}
        PduBody::DeliverSm(sm) => {
            if status.is_ok() {
                handle_deliver_sm(engine, sequence_number, sm).await?;
            }
        }
        PduBody::EnquireLink => {
            if status.is_ok() {
                engine
                    .lock()
                    .await
                    .send_pdu(&Pdu::new(
                        CommandStatus::ESME_ROK,
                        sequence_number,
                        PduBody::EnquireLinkResp,
                    ))
                    .await?;
            }
        }
        PduBody::EnquireLinkResp => {}
        PduBody::QuerySmResp(resp) => {
            debug!("query_sm_resp: {:?}", resp);
        }
        PduBody::GenericNack => {
            warn!(
                "generic_nack for sequence {}: {:?} ({})",
                sequence_number,
                status,
                status.description()
            );
        }
        PduBody::Other { command_id, .. } => {
            warn!(
                "Ignoring PDU with unknown command_id {:#010X}",
                command_id
            );
        }
        // Request PDUs an SMSC has no business sending us.
        PduBody::BindTransceiver(_)
        | PduBody::SubmitSm(_)
        | PduBody::SubmitMulti(_)
        | PduBody::QuerySm(_)
        | PduBody::DeliverSmResp(_) => {
            warn!("Ignoring unexpected {} from the SMSC", pdu.command_id());
        }
    }
    Ok(())
}

async fn handle_submit_sm_resp(
    engine: &Arc<Mutex<ClientEngine>>,
    sequence_number: u32,
    status: CommandStatus,
    message_id: Option<String>,
) -> Result<(), EngineError> {
    let (events, store, keys, _) = engine.lock().await.context();
    let unacked = keys.unacked();
    store
        .list_pop_left(&unacked)
        .await
        .map_err(EngineError::Store)?;
    if let Ok(len) = store.list_len(&unacked).await {
        info!("{}: {}", unacked, len);
    }
    events
        .on_submit_sm_resp(
            sequence_number,
            status,
            CommandId::SubmitSmResp,
            message_id,
        )
        .await;
    Ok(())
}

async fn handle_deliver_sm(
    engine: &Arc<Mutex<ClientEngine>>,
    sequence_number: u32,
    sm: SmBody,
) -> Result<(), EngineError> {
    // Acknowledge first, with the SMSC's sequence number.
    engine
        .lock()
        .await
        .send_pdu(&Pdu::new(
            CommandStatus::ESME_ROK,
            sequence_number,
            PduBody::DeliverSmResp(DeliverSmRespBody::default()),
        ))
        .await?;

    let (events, store, keys, multipart_ttl) =
        engine.lock().await.context();

    if let Some(report) = parse_delivery_report(&sm.short_message) {
        events
            .on_delivery_report(sm.destination_addr, sm.source_addr, report)
            .await;
    } else if let Some(fragment) = detect_multipart(&sm) {
        let key = keys
            .multipart(&fragment.key(&sm.source_addr, &sm.destination_addr));
        debug!("Multipart buffer key: {}", key);
        let stored = store.get(&key).await.map_err(EngineError::Store)?;
        let mut assembly = MultipartAssembly::from_stored(stored.as_deref());
        assembly.add(&fragment);
        if let Some(message) = assembly.completed(fragment.total) {
            store.delete(&key).await.map_err(EngineError::Store)?;
            debug!("Re-assembled message of {} octets", message.len());
            let text = decode_short_message(&message, sm.data_coding);
            events
                .on_deliver_sm(sm.destination_addr, sm.source_addr, text)
                .await;
        } else {
            store
                .set_expiring(&key, &assembly.to_stored(), multipart_ttl)
                .await
                .map_err(EngineError::Store)?;
        }
    } else {
        let text = decode_short_message(&sm.short_message, sm.data_coding);
        events
            .on_deliver_sm(sm.destination_addr, sm.source_addr, text)
            .await;
    }
    Ok(())
}
