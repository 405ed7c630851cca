//! Socket handles

use super::Runtime;
use crate::callback::CallbackRef;
use crate::handle::{FieldValue, HandleId, IoField, IoObject};
use crate::inspector::{ACCEPT_FIELD, READ_FIELD};
use tracing::trace;

const TCP_TYPE: &str = "TCP";

impl Runtime {
    /// Open a listening socket that runs `on_connection` per accepted peer
    pub fn listen(&mut self, on_connection: CallbackRef) -> HandleId {
        let fd = self.alloc_fd();
        let io = IoObject {
            fd: Some(fd),
            fields: vec![
                IoField::value("reading", FieldValue::Flag(false)),
                IoField::callback(ACCEPT_FIELD, on_connection),
            ],
        };
        self.alloc_handle(TCP_TYPE, None, Some(io))
    }

    /// Open a connected socket that runs `on_read` when data arrives
    pub fn connect(&mut self, on_read: CallbackRef) -> HandleId {
        let fd = self.alloc_fd();
        let io = IoObject {
            fd: Some(fd),
            fields: vec![
                IoField::value("reading", FieldValue::Flag(true)),
                IoField::callback(READ_FIELD, on_read),
                IoField::value("bytesRead", FieldValue::Number(0)),
            ],
        };
        self.alloc_handle(TCP_TYPE, None, Some(io))
    }

    /// Register a socket-like handle with an arbitrary I/O object
    pub fn adopt_socket(&mut self, type_name: &str, io: IoObject) -> HandleId {
        self.alloc_handle(type_name, None, Some(io))
    }

    /// Close a socket handle. Timer handles are left alone.
    pub fn close(&mut self, handle: HandleId) -> bool {
        let is_socket = self
            .handles
            .get(&handle)
            .is_some_and(|h| h.io.is_some());
        if is_socket {
            self.handles.remove(&handle);
            trace!(%handle, "socket closed");
        }
        is_socket
    }

    fn alloc_fd(&mut self) -> i32 {
        let fd = self.next_fd;
        self.next_fd += 1;
        fd
    }
}
