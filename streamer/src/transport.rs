use protocol::{HostMessage, HostReply};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio_serde::{formats::Json, Framed};
use tokio_util::codec::{BytesCodec, FramedRead, FramedWrite};

type WrappedStream = FramedRead<OwnedReadHalf, BytesCodec>;
type WrappedSink = FramedWrite<OwnedWriteHalf, BytesCodec>;
pub type ReplyStream = Framed<WrappedStream, HostReply, (), Json<HostReply, ()>>;
pub type UpdateSink = Framed<WrappedSink, (), HostMessage, Json<(), HostMessage>>;

// Same shape as a length delimited setup, but the host expects bare json:
// BytesCodec writes each serialized message as is, and hands back whatever
// bytes one read produced for the json decoder to try.
pub fn wrap_stream(stream: TcpStream) -> (ReplyStream, UpdateSink) {
    let (read, write) = stream.into_split();

    let stream = WrappedStream::new(read, BytesCodec::new());
    let sink = WrappedSink::new(write, BytesCodec::new());
    (
        ReplyStream::new(stream, Json::default()),
        UpdateSink::new(sink, Json::default()),
    )
}
