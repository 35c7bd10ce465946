#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

pub const MEDALS_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Games</title></head>
<body>
  <h1>Winter Games</h1>
  <h2>Medal table</h2>
  <table class="wikitable">
    <thead>
      <tr><th>Nation</th><th>Gold</th><th>Silver</th></tr>
    </thead>
    <tbody>
      <tr><td>Norway</td><td>16</td><td>8</td></tr>
      <tr><td>Germany</td><td>12</td></tr>
      <tr><td>Canada, "North"</td><td>4</td><td>8</td></tr>
    </tbody>
  </table>
  <h3>Venues: indoor / outdoor?</h3>
  <table>
    <tr><td>Venue</td><td>Capacity</td></tr>
    <tr><td>Ice Dome</td><td>12 000</td></tr>
  </table>
  <table>
    <tr><th>Only a header</th></tr>
  </table>
  <p>Footer</p>
</body>
</html>
"#;

pub fn write_page(dir: &Path, name: &str, html: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, html).expect("fixture should be written");
    path
}

/// Serves exactly one HTTP response on a random local port.
pub fn serve_once(
    status_line: &'static str,
    content_type: &'static str,
    body: Vec<u8>,
) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let address = listener.local_addr().expect("local address");

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept connection");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
        let mut line = String::new();
        while reader.read_line(&mut line).expect("read request") > 2 {
            line.clear();
        }

        let head = format!(
            "{status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        stream.write_all(head.as_bytes()).expect("write head");
        stream.write_all(&body).expect("write body");
        stream.flush().expect("flush");
    });

    (format!("http://{address}"), handle)
}
