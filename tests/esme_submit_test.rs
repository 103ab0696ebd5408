use smpp_esme::esme::{FaultClass, MultiDest, SubmitFields};
use smpp_esme::pdu::{CommandId, CommandStatus, DestAddress, PduBody};
use smpp_esme::session_store::SessionStore;


use test_utils::{
    start_client, start_client_with_handlers, submit_sm_resp, Event,
    TestSmsc,
};

#[tokio::test]
async fn a_submit_is_acked_and_the_unacked_list_breathes() {
    let smsc = TestSmsc::start().await.unwrap();
    let (esme, events, store) = start_client(&smsc).await;
    let mut conn = smsc.accept().await.unwrap();
    conn.accept_bind().await;
    let engine = events.wait_for_connect(0).await;
    let unacked = smsc.session_keys().unacked();

    let sequence_number = engine
        .lock()
        .await
        .submit_sm(SubmitFields {
            source_addr: String::from("447000123123"),
            destination_addr: String::from("447111222333"),
            short_message: b"hi".to_vec(),
            data_coding: 1,
            ..SubmitFields::default()
        })
        .await
        .unwrap();
    // First allocation after the bind: increment + offset
    assert_eq!(sequence_number, 2);

    let pdu = conn.read_pdu().await;
    assert_eq!(pdu.sequence_number, 2);
    match pdu.body() {
        PduBody::SubmitSm(body) => {
            assert_eq!(body.source_addr, "447000123123");
            assert_eq!(body.destination_addr, "447111222333");
            assert_eq!(body.short_message, b"hi");
        }
        other => panic!("unexpected body: {:?}", other),
    }
    assert_eq!(store.list_len(&unacked).await.unwrap(), 1);

    conn.send_pdu(&submit_sm_resp(2, CommandStatus::ESME_ROK, Some("ABC123")))
        .await;

    events
        .wait_for(|events| {
            events.contains(&Event::SubmitSmResp {
                sequence_number: 2,
                command_status: CommandStatus::ESME_ROK,
                command_id: CommandId::SubmitSmResp,
                message_id: Some(String::from("ABC123")),
            })
        })
        .await;
    assert_eq!(store.list_len(&unacked).await.unwrap(), 0);

    esme.stop().await;
}

#[tokio::test]
async fn k_submits_then_k_resps_leave_the_unacked_list_empty() {
    let smsc = TestSmsc::start().await.unwrap();
    let (esme, events, store) = start_client(&smsc).await;
    let mut conn = smsc.accept().await.unwrap();
    conn.accept_bind().await;
    let engine = events.wait_for_connect(0).await;
    let unacked = smsc.session_keys().unacked();

    let mut sequence_numbers = Vec::new();
    for _ in 0..4 {
        let sequence_number = engine
            .lock()
            .await
            .submit_sm(SubmitFields {
                destination_addr: String::from("447111222333"),
                short_message: b"x".to_vec(),
                ..SubmitFields::default()
            })
            .await
            .unwrap();
        sequence_numbers.push(sequence_number);
        conn.read_pdu().await;
    }
    assert_eq!(store.list_len(&unacked).await.unwrap(), 4);

    for sequence_number in &sequence_numbers {
        conn.send_pdu(&submit_sm_resp(
            *sequence_number,
            CommandStatus::ESME_ROK,
            Some("id"),
        ))
        .await;
    }
    events
        .wait_for(|events| {
            events
                .iter()
                .filter(|e| matches!(e, Event::SubmitSmResp { .. }))
                .count()
                == 4
        })
        .await;
    assert_eq!(store.list_len(&unacked).await.unwrap(), 0);

    esme.stop().await;
}

#[tokio::test]
async fn a_throttled_resp_hits_the_throttle_handler_and_still_pops() {
    let smsc = TestSmsc::start().await.unwrap();
    let (handlers, seen) = test_utils::recording_fault_handlers();
    let (esme, events, store) =
        start_client_with_handlers(&smsc, handlers).await;
    let mut conn = smsc.accept().await.unwrap();
    conn.accept_bind().await;
    let engine = events.wait_for_connect(0).await;
    let unacked = smsc.session_keys().unacked();

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
    conn.read_pdu().await;

    conn.send_pdu(&submit_sm_resp(
        sequence_number,
        CommandStatus::ESME_RTHROTTLED,
        None,
    ))
    .await;

    events
        .wait_for(|events| {
            events.contains(&Event::SubmitSmResp {
                sequence_number,
                command_status: CommandStatus::ESME_RTHROTTLED,
                command_id: CommandId::SubmitSmResp,
                message_id: None,
            })
        })
        .await;
    assert!(seen.lock().unwrap().contains(&FaultClass::ConnThrottle));
    assert_eq!(store.list_len(&unacked).await.unwrap(), 0);

    esme.stop().await;
}

#[tokio::test]
async fn submit_multi_carries_every_destination_kind_without_unacked() {
    let smsc = TestSmsc::start().await.unwrap();
    let (esme, events, store) = start_client(&smsc).await;
    let mut conn = smsc.accept().await.unwrap();
    conn.accept_bind().await;
    let engine = events.wait_for_connect(0).await;

    let sequence_number = engine
        .lock()
        .await
        .submit_multi(
            vec![
                MultiDest::address("447111222333"),
                MultiDest::Sme {
                    destination_addr: String::from("447444555666"),
                    dest_addr_ton: Some(1),
                    dest_addr_npi: Some(1),
                },
                MultiDest::DistributionList(String::from("friends")),
            ],
            SubmitFields {
                source_addr: String::from("447000123123"),
                short_message: b"fan out".to_vec(),
                ..SubmitFields::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(sequence_number, 2);

    let pdu = conn.read_pdu().await;
    match pdu.body() {
        PduBody::SubmitMulti(body) => {
            assert_eq!(
                body.dest_addresses,
                vec![
                    DestAddress::Sme {
                        dest_addr_ton: 0,
                        dest_addr_npi: 0,
                        destination_addr: String::from("447111222333"),
                    },
                    DestAddress::Sme {
                        dest_addr_ton: 1,
                        dest_addr_npi: 1,
                        destination_addr: String::from("447444555666"),
                    },
                    DestAddress::DistributionList(String::from("friends")),
                ]
            );
        }
        other => panic!("unexpected body: {:?}", other),
    }

    // submit_multi is not accounted on the unacked list
    let unacked = smsc.session_keys().unacked();
    assert_eq!(store.list_len(&unacked).await.unwrap(), 0);

    esme.stop().await;
}

#[tokio::test]
async fn query_sm_goes_out_with_the_next_sequence_number() {
    let smsc = TestSmsc::start().await.unwrap();
    let (esme, events, _store) = start_client(&smsc).await;
    let mut conn = smsc.accept().await.unwrap();
    conn.accept_bind().await;
    let engine = events.wait_for_connect(0).await;

    let sequence_number = engine
        .lock()
        .await
        .query_sm("ABC123", "447000123123")
        .await
        .unwrap();
    assert_eq!(sequence_number, 2);

    let pdu = conn.read_pdu().await;
    assert_eq!(pdu.sequence_number, 2);
    match pdu.body() {
        PduBody::QuerySm(body) => {
            assert_eq!(body.message_id, "ABC123");
            assert_eq!(body.source_addr, "447000123123");
        }
        other => panic!("unexpected body: {:?}", other),
    }

    esme.stop().await;
}
