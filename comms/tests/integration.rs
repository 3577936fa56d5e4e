use comms::{
    Frame,
    specs::{FuncId, Query, Report},
};
use tokio::io::{self, AsyncWriteExt};

const SIZE: usize = 128;

#[tokio::test]
async fn send_recv_query() {
    let query = Query::new(0.0, std::f64::consts::PI, 1000, FuncId::Sine).unwrap();

    let (one, two) = io::duplex(SIZE);
    let (_, tx) = io::split(one);
    comms::sender(tx).send(&query).await.unwrap();

    let (rx, _) = io::split(two);
    let received: Query = comms::receiver(rx).recv().await.unwrap();

    assert_eq!(received, query);
}

#[tokio::test]
async fn send_recv_report() {
    let query = Query::new(-10.0, 10.0, 100_000, FuncId::Gaussian).unwrap();
    let report = Report::new(&query, 0.999_999_999);

    let (one, two) = io::duplex(SIZE);
    let (rx, tx) = io::split(one);
    let (_, tx) = comms::channel(rx, tx);
    tx.send(&report).await.unwrap();

    let (rx, _) = io::split(two);
    let received: Report = comms::receiver(rx).recv().await.unwrap();

    assert_eq!(received, report);
}

#[tokio::test]
async fn short_read_is_unexpected_eof() {
    let (mut one, two) = io::duplex(SIZE);
    one.write_all(&[0; 20]).await.unwrap();
    drop(one);

    let err = comms::receiver(two).recv::<Query>().await.unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
}

#[tokio::test]
async fn closed_channel_is_unexpected_eof() {
    let (one, two) = io::duplex(SIZE);
    drop(one);

    let err = comms::receiver(two).recv::<Report>().await.unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
}

#[tokio::test]
async fn sender_closes_after_single_frame() {
    let query = Query::new(1.0, 2.0, 3, FuncId::ChargeDecay).unwrap();

    let (one, mut two) = io::duplex(SIZE);
    comms::sender(one).send(&query).await.unwrap();

    let mut bytes = Vec::new();
    tokio::io::AsyncReadExt::read_to_end(&mut two, &mut bytes)
        .await
        .unwrap();

    assert_eq!(bytes.len(), Query::frame_size());
}
