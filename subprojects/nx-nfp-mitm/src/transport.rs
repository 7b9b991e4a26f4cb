//! JSON-lines transport for driving the server from a host.
//!
//! Every input line is one JSON object tagged by `op`:
//!
//! ```text
//! {"op":"open"}
//! {"op":"request","object":2,"cmd":0}
//! {"op":"request","object":2,"cmd":17,"device_handle":1431984473}
//! {"op":"press","keys":["L","R"]}
//! {"op":"close","object":2}
//! ```
//!
//! Every input line produces exactly one output line tagged by `event`.
//! `press` latches buttons on the virtual pad read by the input monitor and is
//! never forwarded to the server. Lines that fail to parse are answered with
//! an `invalid` event and otherwise ignored.

use std::{
    error::Error as _,
    io::{BufRead, Write},
};

use serde::{Deserialize, Serialize};

use nx_service_nfp::RawRequest;

use crate::{
    input::{Keys, VirtualPad},
    server::{Message, ObjectId, Reply, ServerError, Transport, TransportError},
};

/// An input line.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum WireMessage {
    Open,
    Close {
        object: u32,
    },
    Request {
        object: u32,
        cmd: u32,
        #[serde(default)]
        device_handle: u64,
        #[serde(default)]
        aruid: u64,
        #[serde(default)]
        in_buffer: Vec<u8>,
    },
    Press {
        keys: Vec<String>,
    },
}

/// An output line.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum WireReply {
    Opened {
        object: u32,
    },
    Closed {
        object: u32,
    },
    Pressed {
        keys: u64,
    },
    Response {
        object: u32,
        cmd: u32,
        result: u32,
        result_code: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        buffer: Option<Vec<u8>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        handle: Option<u32>,
    },
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        object: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        cmd: Option<u32>,
        result: u32,
        result_code: String,
        message: String,
    },
    Invalid {
        line: usize,
        message: String,
    },
}

impl From<Reply> for WireReply {
    fn from(reply: Reply) -> Self {
        match reply {
            Reply::Opened(object) => Self::Opened { object: object.0 },
            Reply::Closed(object) => Self::Closed { object: object.0 },
            Reply::Response {
                object,
                cmd_id,
                response,
            } => Self::Response {
                object: object.0,
                cmd: cmd_id,
                result: 0,
                result_code: nx_service_nfp::ResultCode::SUCCESS.to_string(),
                value: response.out_value(),
                buffer: response.out_buffer(),
                handle: response.copy_handle().map(|event| event.handle().to_raw()),
            },
            Reply::Error {
                object,
                cmd_id,
                error,
            } => {
                let code = error.result_code();
                Self::Error {
                    object: object.map(|object| object.0),
                    cmd: cmd_id,
                    result: code.to_raw(),
                    result_code: code.to_string(),
                    message: error_chain(&error),
                }
            }
        }
    }
}

/// Formats an error and its sources as `outer: inner: ...`.
fn error_chain(error: &ServerError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(err) = source {
        message.push_str(": ");
        message.push_str(&err.to_string());
        source = err.source();
    }
    message
}

/// Line-delimited JSON transport over a reader and a writer.
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,
    pad: VirtualPad,
    line: usize,
}

impl<R: BufRead, W: Write> LineTransport<R, W> {
    /// Creates a transport that latches `press` messages on `pad`.
    pub fn new(reader: R, writer: W, pad: VirtualPad) -> Self {
        Self {
            reader,
            writer,
            pad,
            line: 0,
        }
    }

    /// Returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn write(&mut self, reply: &WireReply) -> Result<(), TransportError> {
        serde_json::to_writer(&mut self.writer, reply)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> Transport for LineTransport<R, W> {
    fn receive(&mut self) -> Result<Option<Message>, TransportError> {
        let mut buf = String::new();
        loop {
            buf.clear();
            if self.reader.read_line(&mut buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let text = buf.trim();
            if text.is_empty() {
                continue;
            }

            let message = match serde_json::from_str::<WireMessage>(text) {
                Ok(message) => message,
                Err(err) => {
                    tracing::warn!(line = self.line, %err, "ignoring malformed message");
                    self.write(&WireReply::Invalid {
                        line: self.line,
                        message: err.to_string(),
                    })?;
                    continue;
                }
            };

            match message {
                WireMessage::Open => return Ok(Some(Message::Open)),
                WireMessage::Close { object } => {
                    return Ok(Some(Message::Close {
                        object: ObjectId(object),
                    }));
                }
                WireMessage::Request {
                    object,
                    cmd,
                    device_handle,
                    aruid,
                    in_buffer,
                } => {
                    return Ok(Some(Message::Request {
                        object: ObjectId(object),
                        request: RawRequest {
                            cmd_id: cmd,
                            device_handle,
                            aruid,
                            in_buffer,
                        },
                    }));
                }
                WireMessage::Press { keys } => {
                    let reply = match Keys::from_names(&keys) {
                        Ok(keys) => {
                            tracing::debug!(?keys, "virtual pad press");
                            self.pad.press(keys);
                            WireReply::Pressed { keys: keys.bits() }
                        }
                        Err(err) => WireReply::Invalid {
                            line: self.line,
                            message: err.to_string(),
                        },
                    };
                    self.write(&reply)?;
                }
            }
        }
    }

    fn send(&mut self, reply: Reply) -> Result<(), TransportError> {
        self.write(&WireReply::from(reply))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use serde_json::{Value, json};

    use super::*;
    use crate::input::InputSource;

    fn transport(input: &str) -> LineTransport<Cursor<Vec<u8>>, Vec<u8>> {
        LineTransport::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), VirtualPad::new())
    }

    fn output(transport: LineTransport<Cursor<Vec<u8>>, Vec<u8>>) -> Vec<Value> {
        String::from_utf8(transport.into_writer())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_receive_parses_messages() {
        let mut transport = transport(
            "{\"op\":\"open\"}\n\n{\"op\":\"request\",\"object\":2,\"cmd\":21,\"device_handle\":7}\n{\"op\":\"close\",\"object\":2}\n",
        );

        assert_eq!(transport.receive().unwrap(), Some(Message::Open));
        assert_eq!(
            transport.receive().unwrap(),
            Some(Message::Request {
                object: ObjectId(2),
                request: RawRequest {
                    cmd_id: 21,
                    device_handle: 7,
                    ..RawRequest::default()
                },
            })
        );
        assert_eq!(
            transport.receive().unwrap(),
            Some(Message::Close { object: ObjectId(2) })
        );
        assert_eq!(transport.receive().unwrap(), None);
    }

    #[test]
    fn test_malformed_lines_are_reported_and_skipped() {
        let mut transport = transport("not json\n{\"op\":\"fly\"}\n{\"op\":\"open\"}\n");

        assert_eq!(transport.receive().unwrap(), Some(Message::Open));

        let lines = output(transport);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "invalid");
        assert_eq!(lines[0]["line"], 1);
        assert_eq!(lines[1]["line"], 2);
    }

    #[test]
    fn test_press_latches_virtual_pad() {
        let mut pad = VirtualPad::new();
        let mut transport = LineTransport::new(
            Cursor::new(b"{\"op\":\"press\",\"keys\":[\"L\",\"R\"]}\n".to_vec()),
            Vec::new(),
            pad.clone(),
        );

        assert_eq!(transport.receive().unwrap(), None);
        assert_eq!(pad.keys_down().unwrap(), Keys::L | Keys::R);
        assert_eq!(
            output(transport),
            vec![json!({"event": "pressed", "keys": (Keys::L | Keys::R).bits()})]
        );
    }

    #[test]
    fn test_send_error_reply() {
        let mut transport = transport("");
        transport
            .send(Reply::Error {
                object: Some(ObjectId(5)),
                cmd_id: Some(0),
                error: ServerError::UnknownObject(ObjectId(5)),
            })
            .unwrap();

        let lines = output(transport);
        assert_eq!(lines[0]["event"], "error");
        assert_eq!(lines[0]["object"], 5);
        assert_eq!(lines[0]["result_code"], "2010-0261");
        assert_eq!(lines[0]["message"], "no session with object id 5");
    }
}
