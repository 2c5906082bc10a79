use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use libmqtt::client::{Client, Message, Options, QoS};
use libmqtt::network::error::Error;
use libmqtt::network::{Close, Connection, Read, Write};
use libmqtt::packet::connect::encode_connect;
use libmqtt::packet::publish::{decode_publish, encode_publish};
use libmqtt::time::Timer;
use rand::RngCore;

const PAYLOAD_LEN: usize = 256;

/// A connection that swallows writes and never produces data.
struct SinkConnection;

impl Read for SinkConnection {
    type Error = Error;

    fn read(&mut self, _buf: &mut [u8], _timeout_ms: u32) -> Result<usize, Self::Error> {
        Ok(0)
    }
}

impl Write for SinkConnection {
    type Error = Error;

    fn write(&mut self, buf: &[u8], _timeout_ms: u32) -> Result<usize, Self::Error> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for SinkConnection {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Connection for SinkConnection {}

struct NoopTimer;

impl Timer for NoopTimer {
    fn set(&mut self, _millis: u32) {}

    fn remaining(&mut self) -> u32 {
        0
    }
}

fn random_payload() -> [u8; PAYLOAD_LEN] {
    let mut payload = [0u8; PAYLOAD_LEN];
    rand::thread_rng().fill_bytes(&mut payload);
    payload
}

pub fn bench_encode_publish(c: &mut Criterion) {
    let payload = random_payload();
    let message = Message {
        qos: QoS::AtLeastOnce,
        retained: false,
        payload: &payload,
    };
    let mut buf = [0u8; PAYLOAD_LEN + 32];

    let mut group = c.benchmark_group("encode_publish");
    group.throughput(Throughput::Bytes(PAYLOAD_LEN as u64));
    group.bench_function("encode_publish", |b| {
        b.iter(|| encode_publish(&mut buf, false, 1, "bench/topic", &message).unwrap())
    });
    group.finish();
}

pub fn bench_decode_publish(c: &mut Criterion) {
    let payload = random_payload();
    let message = Message {
        qos: QoS::AtLeastOnce,
        retained: false,
        payload: &payload,
    };
    let mut buf = [0u8; PAYLOAD_LEN + 32];
    let len = encode_publish(&mut buf, false, 1, "bench/topic", &message).unwrap();

    let mut group = c.benchmark_group("decode_publish");
    group.throughput(Throughput::Bytes(PAYLOAD_LEN as u64));
    group.bench_function("decode_publish", |b| {
        b.iter(|| decode_publish(&buf[..len]).unwrap())
    });
    group.finish();
}

pub fn bench_encode_connect(c: &mut Criterion) {
    let options = Options::new("libmqtt-bench-client", 60);
    let mut buf = [0u8; 128];

    c.bench_function("encode_connect", |b| {
        b.iter(|| encode_connect(&mut buf, &options, None).unwrap())
    });
}

pub fn bench_client_publish_qos0(c: &mut Criterion) {
    let payload = random_payload();
    let message = Message {
        qos: QoS::AtMostOnce,
        retained: false,
        payload: &payload,
    };
    let mut write_buf = [0u8; PAYLOAD_LEN + 32];
    let mut read_buf = [0u8; 32];
    let mut client = Client::new(
        SinkConnection,
        NoopTimer,
        NoopTimer,
        &mut write_buf,
        &mut read_buf,
    );

    let mut group = c.benchmark_group("client_publish_qos0");
    group.throughput(Throughput::Bytes(PAYLOAD_LEN as u64));
    group.bench_function("client_publish_qos0", |b| {
        b.iter(|| client.publish("bench/topic", &message, 1000).unwrap())
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_encode_publish,
    bench_decode_publish,
    bench_encode_connect,
    bench_client_publish_qos0
);
criterion_main!(benches);
