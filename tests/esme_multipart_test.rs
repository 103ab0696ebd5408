use smpp_esme::data_coding::DeliveredText;
use smpp_esme::pdu::codec::{tags, Tlv};
use smpp_esme::session_store::SessionStore;


use test_utils::{deliver_sm, start_client, Event, TestSmsc};

/// short_message carrying an 8-bit concat UDH ahead of the payload.
fn udh_payload(ref_num: u8, total: u8, seq: u8, text: &[u8]) -> Vec<u8> {
    let mut short_message = vec![0x05, 0x00, 0x03, ref_num, total, seq];
    short_message.extend_from_slice(text);
    short_message
}

fn sar_tlvs(ref_num: u16, total: u8, seq: u8) -> Vec<Tlv> {
    vec![
        Tlv {
            tag: tags::SAR_MSG_REF_NUM,
            value: ref_num.to_be_bytes().to_vec(),
        },
        Tlv {
            tag: tags::SAR_TOTAL_SEGMENTS,
            value: vec![total],
        },
        Tlv {
            tag: tags::SAR_SEGMENT_SEQNUM,
            value: vec![seq],
        },
    ]
}

#[tokio::test]
async fn out_of_order_udh_fragments_reassemble_once() {
    let smsc = TestSmsc::start().await.unwrap();
    let (esme, events, store) = start_client(&smsc).await;
    let mut conn = smsc.accept().await.unwrap();
    conn.accept_bind().await;
    events.wait_for_connect(0).await;

    let key = smsc
        .session_keys()
        .multipart("42_2_447111222333_447000123123");

    // Fragment 2 arrives first
    conn.send_pdu(&deliver_sm(
        200,
        "447111222333",
        "447000123123",
        1,
        0x40,
        &udh_payload(42, 2, 2, b"world"),
        vec![],
    ))
    .await;
    conn.read_pdu().await;

    // The partial assembly is parked in the store
    let deadline = tokio::time::Instant::now()
        + tokio::time::Duration::from_secs(5);
    loop {
        if store.get(&key).await.unwrap().is_some() {
            break;
        }
        assert!(tokio::time::Instant::now() < deadline);
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
    }
    assert_eq!(events.count(|e| matches!(e, Event::DeliverSm { .. })), 0);

    // Fragment 1 completes the message
    conn.send_pdu(&deliver_sm(
        201,
        "447111222333",
        "447000123123",
        1,
        0x40,
        &udh_payload(42, 2, 1, b"hello "),
        vec![],
    ))
    .await;
    conn.read_pdu().await;

    events
        .wait_for(|events| {
            events.contains(&Event::DeliverSm {
                destination_addr: String::from("447000123123"),
                source_addr: String::from("447111222333"),
                short_message: DeliveredText::Text(String::from(
                    "hello world",
                )),
            })
        })
        .await;
    assert_eq!(events.count(|e| matches!(e, Event::DeliverSm { .. })), 1);

    // Completion deletes the buffer
    assert_eq!(store.get(&key).await.unwrap(), None);

    esme.stop().await;
}

#[tokio::test]
async fn a_duplicate_fragment_is_idempotent() {
    let smsc = TestSmsc::start().await.unwrap();
    let (esme, events, _store) = start_client(&smsc).await;
    let mut conn = smsc.accept().await.unwrap();
    conn.accept_bind().await;
    events.wait_for_connect(0).await;

    for (sequence_number, seq) in &[(300u32, 1u8), (301, 1), (302, 2)] {
        let text: &[u8] =
            if *seq == 1 { b"first " } else { b"second" };
        conn.send_pdu(&deliver_sm(
            *sequence_number,
            "447111222333",
            "447000123123",
            1,
            0x40,
            &udh_payload(7, 2, *seq, text),
            vec![],
        ))
        .await;
        conn.read_pdu().await;
    }

    events
        .wait_for(|events| {
            events.iter().any(|e| {
                matches!(e, Event::DeliverSm { short_message, .. }
                    if *short_message
                        == DeliveredText::Text(String::from("first second")))
            })
        })
        .await;
    assert_eq!(events.count(|e| matches!(e, Event::DeliverSm { .. })), 1);

    esme.stop().await;
}

#[tokio::test]
async fn sar_parameters_reassemble_without_a_udh() {
    let smsc = TestSmsc::start().await.unwrap();
    let (esme, events, _store) = start_client(&smsc).await;
    let mut conn = smsc.accept().await.unwrap();
    conn.accept_bind().await;
    events.wait_for_connect(0).await;

    conn.send_pdu(&deliver_sm(
        400,
        "447111222333",
        "447000123123",
        1,
        0,
        b"part one ",
        sar_tlvs(9, 2, 1),
    ))
    .await;
    conn.read_pdu().await;

    conn.send_pdu(&deliver_sm(
        401,
        "447111222333",
        "447000123123",
        1,
        0,
        b"part two",
        sar_tlvs(9, 2, 2),
    ))
    .await;
    conn.read_pdu().await;

    events
        .wait_for(|events| {
            events.contains(&Event::DeliverSm {
                destination_addr: String::from("447000123123"),
                source_addr: String::from("447111222333"),
                short_message: DeliveredText::Text(String::from(
                    "part one part two",
                )),
            })
        })
        .await;

    esme.stop().await;
}
