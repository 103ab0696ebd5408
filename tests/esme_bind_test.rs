use tokio::time::{sleep, Duration};

use smpp_esme::esme::{ConnectionState, FaultClass, SubmitFields};
use smpp_esme::pdu::{
    BindTransceiverRespBody, CommandStatus, Pdu, PduBody,
};
use smpp_esme::session_store::SessionStore;


use test_utils::{
    recording_fault_handlers, start_client, start_client_with_handlers,
    Event, TestSmsc,
};

#[tokio::test]
async fn on_connect_we_send_bind_transceiver_and_reach_bound_trx() {
    let smsc = TestSmsc::start().await.unwrap();
    let (esme, events, _store) = start_client(&smsc).await;
    let mut conn = smsc.accept().await.unwrap();

    // The bind goes out by itself, sequence_number = offset = 1
    conn.expect_to_receive(
        b"\x00\x00\x00\x29\x00\x00\x00\x09\x00\x00\x00\x00\x00\x00\x00\x01\
        smppclient\0password\0\0\x34\x00\x00\0",
    )
    .await;

    conn.send_pdu(&Pdu::new(
        CommandStatus::ESME_ROK,
        1,
        PduBody::BindTransceiverResp(BindTransceiverRespBody {
            system_id: Some(String::from("TestSmsc")),
        }),
    ))
    .await;

    let engine = events.wait_for_connect(0).await;
    assert_eq!(engine.lock().await.state(), ConnectionState::BoundTrx);

    esme.stop().await;
}

#[tokio::test]
async fn a_rejected_bind_reaches_the_conn_permfault_handler() {
    let smsc = TestSmsc::start().await.unwrap();
    let (handlers, seen) = recording_fault_handlers();
    let (esme, events, _store) =
        start_client_with_handlers(&smsc, handlers).await;
    let mut conn = smsc.accept().await.unwrap();

    let bind = conn.read_pdu().await;
    // command_status = ESME_RINVPASWD, empty body
    conn.send_pdu(&Pdu::new(
        CommandStatus::ESME_RINVPASWD,
        bind.sequence_number,
        PduBody::BindTransceiverResp(BindTransceiverRespBody {
            system_id: None,
        }),
    ))
    .await;

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !seen.lock().unwrap().contains(&FaultClass::ConnPermFault) {
        assert!(tokio::time::Instant::now() < deadline);
        sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(events.count(|e| *e == Event::Connect), 0);

    esme.stop().await;
}

#[tokio::test]
async fn sends_before_the_bind_is_accepted_return_zero() {
    let smsc = TestSmsc::start().await.unwrap();
    let (esme, _events, store) = start_client(&smsc).await;
    let mut conn = smsc.accept().await.unwrap();

    // Swallow the bind without replying: the engine stays in OPEN
    let _bind = conn.read_pdu().await;

    let engine = loop {
        if let Some(engine) = esme.engine().await {
            break engine;
        }
        sleep(Duration::from_millis(10)).await;
    };
    assert_eq!(engine.lock().await.state(), ConnectionState::Open);

    let sequence_number = engine
        .lock()
        .await
        .submit_sm(SubmitFields {
            destination_addr: String::from("447111222333"),
            short_message: b"too early".to_vec(),
            ..SubmitFields::default()
        })
        .await
        .unwrap();
    assert_eq!(sequence_number, 0);

    let unacked = smsc.session_keys().unacked();
    assert_eq!(store.list_len(&unacked).await.unwrap(), 0);

    esme.stop().await;
    drop(conn);
}

#[tokio::test]
async fn the_sequence_cursor_follows_offset_and_increment() {
    let smsc = TestSmsc::start().await.unwrap();
    let mut config = test_utils::test_config(&smsc);
    config.smpp_offset = 3;
    config.smpp_increment = 10;
    let (esme, events, _store) =
        test_utils::start_client_with_config(config).await;
    let mut conn = smsc.accept().await.unwrap();

    let bind = conn.accept_bind().await;
    assert_eq!(bind.sequence_number, 3);

    let engine = events.wait_for_connect(0).await;
    for expected in &[13u32, 23, 33] {
        let sequence_number = engine
            .lock()
            .await
            .submit_sm(SubmitFields {
                destination_addr: String::from("447111222333"),
                short_message: b"hi".to_vec(),
                ..SubmitFields::default()
            })
            .await
            .unwrap();
        assert_eq!(sequence_number, *expected);
        let pdu = conn.read_pdu().await;
        assert_eq!(pdu.sequence_number, *expected);
    }

    esme.stop().await;
}
