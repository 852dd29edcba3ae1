//! Test helpers shared by unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Cursor, Write};

use modlinks::error::TransportError;
use modlinks::{Response, Transport};
use zip::write::SimpleFileOptions;

/// Serves canned responses and records requested URLs.
#[derive(Default)]
pub struct MemoryTransport {
    responses: HashMap<String, (u16, Vec<u8>)>,
    requests: RefCell<Vec<String>>,
}

impl MemoryTransport {
    pub fn serve(mut self, url: &str, body: &[u8]) -> Self {
        self.responses.insert(url.to_string(), (200, body.to_vec()));
        self
    }

    pub fn fail(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_string(), (status, Vec::new()));
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl Transport for MemoryTransport {
    fn get(&self, url: &str) -> Result<Response, TransportError> {
        self.requests.borrow_mut().push(url.to_string());
        match self.responses.get(url) {
            Some((status, body)) => Ok(Response {
                status: *status,
                ..Response::ok(body.clone())
            }),
            None => Err(TransportError::Request {
                url: url.to_string(),
                message: "no route to host".to_string(),
            }),
        }
    }
}

/// Build an in-memory ZIP archive. Names ending in `/` become directories.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    hex::encode(Sha256::digest(bytes))
}
