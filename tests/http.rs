extern crate huehub;

use huehub::{Bridge, Error, HttpTransport, LightState};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Request line, lower-cased headers and body as seen by the server
struct Received {
	head: String,
	body: String,
}

fn read_request(stream: &TcpStream) -> Received {
	let mut reader = BufReader::new(stream.try_clone().unwrap());
	let mut head = String::new();
	let mut content_length = 0;
	loop {
		let mut line = String::new();
		reader.read_line(&mut line).unwrap();
		if line == "\r\n" || line.is_empty() {
			break;
		}
		let line = line.to_ascii_lowercase();
		if let Some(value) = line.strip_prefix("content-length:") {
			content_length = value.trim().parse().unwrap();
		}
		head.push_str(&line);
	}
	let mut body = vec![0; content_length];
	reader.read_exact(&mut body).unwrap();
	Received {
		head,
		body: String::from_utf8(body).unwrap(),
	}
}

/// Serves exactly one HTTP exchange on a free local port.
fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Received>) {
	let listener = TcpListener::bind("127.0.0.1:0").unwrap();
	let address = format!("127.0.0.1:{}", listener.local_addr().unwrap().port());
	let handle = thread::spawn(move || {
		let (mut stream, _) = listener.accept().unwrap();
		let received = read_request(&stream);
		let response = format!(
			"HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
			status,
			body.len(),
			body
		);
		stream.write_all(response.as_bytes()).unwrap();
		received
	});
	(address, handle)
}

#[test]
fn get_light_state_over_http() {
	let (address, server) = serve_once(
		"200 OK",
		"{\n\t\"state\": {\n\t\t\"on\": true,\n\t\t\"bri\": 77\n\t},\n\t\"name\": \"Hallway\"\n}\n",
	);
	let bridge = Bridge::new(&address).unwrap().authorize("abc").unwrap();
	let state = bridge.get_light_state(5).unwrap();
	assert_eq!(state.on(), Some(true));
	assert_eq!(state.brightness(), Some(77));

	let received = server.join().unwrap();
	assert!(received.head.starts_with("get /api/abc/lights/5 http/1.1\r\n"));
	assert!(received.body.is_empty());
}

#[test]
fn set_light_state_over_http() {
	let (address, server) = serve_once("200 OK", r#"[{"success":{"/lights/5/state/on":true}}]"#);
	let bridge = Bridge::new(&address).unwrap().authorize("abc").unwrap();
	let results = bridge.set_light_state(5, &LightState::new().with_on(true)).unwrap();
	assert_eq!(results.len(), 1);
	assert!(results[0].is_success());

	let received = server.join().unwrap();
	assert!(received.head.starts_with("put /api/abc/lights/5/state http/1.1\r\n"));
	assert!(received.head.contains("content-type: application/json"));
	assert_eq!(received.body, r#"{"on":true}"#);
}

#[test]
fn register_over_http() {
	let (address, server) = serve_once("200 OK", r#"[{"success":{"username":"issued"}}]"#);
	let bridge = Bridge::new(&format!("http://{}/", address)).unwrap().register().unwrap();
	assert_eq!(bridge.username(), "issued");

	let received = server.join().unwrap();
	assert!(received.head.starts_with("post /api/ http/1.1\r\n"));
	assert!(received.body.contains(r#""devicetype":"HueHubAndroid""#));
}

#[test]
fn http_error_status_is_reported() {
	let (address, server) = serve_once("500 Internal Server Error", "{}");
	let bridge = Bridge::new(&address).unwrap().authorize("abc").unwrap();
	assert!(matches!(bridge.get_light_state(1), Err(Error::Status(500))));
	server.join().unwrap();
}

#[test]
fn unreachable_bridge_is_a_transport_error() {
	let port = {
		let listener = TcpListener::bind("127.0.0.1:0").unwrap();
		listener.local_addr().unwrap().port()
	};
	let bridge = Bridge::new(&format!("127.0.0.1:{}", port))
		.unwrap()
		.authorize("abc")
		.unwrap();
	assert!(matches!(bridge.get_light_state(1), Err(Error::Transport(_))));
}

#[test]
fn every_call_opens_its_own_connection() {
	let listener = TcpListener::bind("127.0.0.1:0").unwrap();
	let address = format!("127.0.0.1:{}", listener.local_addr().unwrap().port());
	let server = thread::spawn(move || {
		// Responses allow keep-alive and the streams stay open, so a second
		// request on the first connection would never be accepted here.
		let mut accepted = Vec::new();
		for _ in 0..2 {
			let (mut stream, _) = listener.accept().unwrap();
			read_request(&stream);
			let body = r#"{"state":{"on":true}}"#;
			write!(
				stream,
				"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
				body.len(),
				body
			)
			.unwrap();
			accepted.push(stream);
		}
		accepted.len()
	});

	let transport = HttpTransport::with_timeout(Some(Duration::from_secs(5))).unwrap();
	let bridge = Bridge::with_transport(&address, transport)
		.unwrap()
		.authorize("abc")
		.unwrap();
	assert_eq!(bridge.get_light_state(1).unwrap().on(), Some(true));
	assert_eq!(bridge.get_light_state(1).unwrap().on(), Some(true));
	assert_eq!(server.join().unwrap(), 2);
}
