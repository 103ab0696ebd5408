use bytes::BytesMut;
use log::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{split, AsyncReadExt, ReadHalf};
use tokio::net::TcpStream;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant};

use crate::esme::connection_state::ConnectionState;
use crate::esme::engine::{data_received, ClientEngine, EngineError};
use crate::esme::esme_config::EsmeConfig;
use crate::esme::esme_events::EsmeEvents;
use crate::esme::fault::FaultHandlers;
use crate::sequence::{ConfigError, SequenceAllocator};
use crate::session_store::SessionStore;

/// Supervises one SMSC relationship: connects, rebuilds a
/// `ClientEngine` per connection (all of them sharing one sequence
/// allocator), and reconnects with bounded exponential backoff until
/// stopped. The backoff resets to its initial value after any
/// connection that reached a successful bind.
pub struct Esme {
    current: Arc<Mutex<Option<Arc<Mutex<ClientEngine>>>>>,
    shutdown_tx: watch::Sender<bool>,
    seq: SequenceAllocator,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Esme {
    pub async fn start<E: EsmeEvents + 'static>(
        config: EsmeConfig,
        events: E,
        store: Arc<dyn SessionStore>,
    ) -> Result<Esme, ConfigError> {
        Esme::start_with_handlers(config, events, store, FaultHandlers::new())
            .await
    }

    pub async fn start_with_handlers<E: EsmeEvents + 'static>(
        config: EsmeConfig,
        events: E,
        store: Arc<dyn SessionStore>,
        fault_handlers: FaultHandlers,
    ) -> Result<Esme, ConfigError> {
        let seq =
            SequenceAllocator::new(config.smpp_offset, config.smpp_increment)?;
        let events: Arc<dyn EsmeEvents> = Arc::new(events);
        let current = Arc::new(Mutex::new(None));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(connect_loop(
            config,
            events,
            store,
            seq.clone(),
            fault_handlers,
            Arc::clone(&current),
            shutdown_rx,
        ));
        Ok(Esme {
            current,
            shutdown_tx,
            seq,
            task: Mutex::new(Some(task)),
        })
    }

    /// The engine of the live connection, if there is one. Present
    /// from TCP connect to teardown; check its state before assuming
    /// the session is bound.
    pub async fn engine(&self) -> Option<Arc<Mutex<ClientEngine>>> {
        self.current.lock().await.clone()
    }

    /// Restores a persisted sequence cursor. Call before the first
    /// bind is made, or the cursor will move backwards.
    pub fn set_latest_sequence_number(&self, latest: u32) {
        self.seq.set_latest(latest);
    }

    /// Graceful shutdown: closes the socket, cancels the keep-alive
    /// and inhibits any further reconnect.
    pub async fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(task) = self.task.lock().await.take() {
            let _ = task.await;
        }
    }
}

async fn connect_loop(
    config: EsmeConfig,
    events: Arc<dyn EsmeEvents>,
    store: Arc<dyn SessionStore>,
    seq: SequenceAllocator,
    fault_handlers: FaultHandlers,
    current: Arc<Mutex<Option<Arc<Mutex<ClientEngine>>>>>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let initial = Duration::from_secs(config.reconnect_initial_secs);
    let max = Duration::from_secs(config.reconnect_max_secs);
    let mut delay = initial;
    loop {
        if *shutdown_rx.borrow() {
            break;
        }
        info!("Connecting to {}:{}", config.host, config.port);
        let stream = tokio::select! {
            stream = TcpStream::connect((config.host.as_str(), config.port)) => stream,
            _ = shutdown_rx.changed() => break,
        };
        match stream {
            Ok(stream) => {
                let was_bound = run_connection(
                    stream,
                    &config,
                    &events,
                    &store,
                    &seq,
                    &fault_handlers,
                    &current,
                    shutdown_rx.clone(),
                )
                .await;
                events.on_disconnect().await;
                if was_bound {
                    delay = initial;
                }
            }
            Err(e) => {
                warn!(
                    "Connection to {}:{} failed: {}",
                    config.host, config.port, e
                );
            }
        }
        if *shutdown_rx.borrow() {
            break;
        }
        debug!("Reconnecting in {:?}", delay);
        tokio::select! {
            _ = sleep(delay) => {}
            _ = shutdown_rx.changed() => break,
        }
        delay = (delay * 2).min(max);
    }
    info!("Reconnect supervisor stopped");
}

#[allow(clippy::too_many_arguments)]
async fn run_connection(
    stream: TcpStream,
    config: &EsmeConfig,
    events: &Arc<dyn EsmeEvents>,
    store: &Arc<dyn SessionStore>,
    seq: &SequenceAllocator,
    fault_handlers: &FaultHandlers,
    current: &Arc<Mutex<Option<Arc<Mutex<ClientEngine>>>>>,
    shutdown_rx: watch::Receiver<bool>,
) -> bool {
    let (read_half, write_half) = split(stream);
    let (state_tx, state_rx) = watch::channel(ConnectionState::Closed);
    let engine = Arc::new(Mutex::new(ClientEngine::new(
        config.clone(),
        write_half,
        seq.clone(),
        Arc::clone(store),
        Arc::clone(events),
        fault_handlers.clone(),
        state_tx,
    )));
    *current.lock().await = Some(Arc::clone(&engine));

    let keepalive = tokio::spawn(bound_loop(
        Arc::clone(&engine),
        Arc::clone(events),
        state_rx,
        Duration::from_secs(config.enquire_link_secs),
    ));

    let result = match engine.lock().await.open().await {
        Ok(()) => read_loop(read_half, &engine, shutdown_rx).await,
        Err(e) => Err(e),
    };

    keepalive.abort();
    let was_bound = {
        let mut engine = engine.lock().await;
        let was_bound = engine.was_bound();
        engine.disconnect().await;
        was_bound
    };
    *current.lock().await = None;

    match result {
        Ok(true) => info!("Connection closed by us"),
        Ok(false) => info!("Connection closed since the SMSC closed it"),
        Err(e) => error!("Connection closed due to error: {}", e),
    }
    was_bound
}

async fn read_loop(
    mut read: ReadHalf<TcpStream>,
    engine: &Arc<Mutex<ClientEngine>>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<bool, EngineError> {
    let mut buffer = BytesMut::with_capacity(4096);
    loop {
        tokio::select! {
            result = read.read_buf(&mut buffer) => {
                eprintln!("DEBUG read_buf result: {:?}", result);
                match result {
                    Ok(0) => return Ok(false),
                    Ok(_) => {
                        let chunk = buffer.split();
                        eprintln!("DEBUG chunk: {:?}", chunk);
                        let r = data_received(engine, &chunk).await;
                        eprintln!("DEBUG data_received result: {:?}", r);
                        r?;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            _ = shutdown_rx.changed() => return Ok(true),
        }
    }
}

/// Waits for the bind to be accepted, fires `on_connect`, then issues
/// a keep-alive enquire_link every period for as long as the session
/// stays bound. Aborted outright when the connection dies, so a stop
/// can never fire twice.
async fn bound_loop(
    engine: Arc<Mutex<ClientEngine>>,
    events: Arc<dyn EsmeEvents>,
    mut state_rx: watch::Receiver<ConnectionState>,
    period: Duration,
) {
    loop {
        if state_rx.borrow().can_transmit() {
            break;
        }
        if state_rx.changed().await.is_err() {
            return;
        }
    }
    events.on_connect(Arc::clone(&engine)).await;

    let mut ticks = interval_at(Instant::now() + period, period);
    loop {
        tokio::select! {
            _ = ticks.tick() => {
                match engine.lock().await.enquire_link().await {
                    Ok(0) => return,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Keep-alive enquire_link failed: {}", e);
                        return;
                    }
                }
            }
            changed = state_rx.changed() => {
                if changed.is_err() || !state_rx.borrow().can_transmit() {
                    return;
                }
            }
        }
    }
}
