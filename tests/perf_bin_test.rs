// Runs the benchmark binaries against each other on the fixed port 1990,
// so these tests must not overlap.

use serial_test::serial;
use std::net::{Ipv4Addr, TcpListener, TcpStream};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::sleep;
use std::time::{Duration, Instant};

const PORT: &str = "1990";

fn spawn(bin: &str, args: &[&str]) -> Child {
    Command::new(bin)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn benchmark binary")
}

fn wait_for_listener() {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        // This connection is accepted, written to once and dropped.
        if TcpStream::connect((Ipv4Addr::LOCALHOST, 1990)).is_ok() {
            return;
        }
        sleep(Duration::from_millis(50));
    }
    panic!("server never started listening on {}", PORT);
}

fn wait_with_timeout(child: &mut Child, limit: Duration) -> ExitStatus {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait().unwrap() {
            return status;
        }
        if Instant::now() > deadline {
            child.kill().unwrap();
            panic!("process did not exit within {:?}", limit);
        }
        sleep(Duration::from_millis(20));
    }
}

fn run_pair(server: (&str, &[&str]), clients: &[(&str, &[&str])]) {
    let mut server = spawn(server.0, server.1);
    wait_for_listener();

    let mut clients: Vec<Child> = clients.iter().map(|(bin, args)| spawn(bin, args)).collect();
    sleep(Duration::from_millis(500));
    for client in clients.iter_mut() {
        assert!(
            client.try_wait().unwrap().is_none(),
            "client stopped while the server was still sending"
        );
    }

    server.kill().unwrap();
    server.wait().unwrap();

    for client in clients.iter_mut() {
        let status = wait_with_timeout(client, Duration::from_secs(10));
        assert!(status.success(), "client exited with {}", status);
    }
}

#[test]
#[serial]
fn contiguous_client_exits_cleanly_when_server_dies() {
    run_pair(
        (env!("CARGO_BIN_EXE_tcp_server"), &[PORT, "4096"]),
        &[(env!("CARGO_BIN_EXE_tcp_client"), &[PORT, "4096"])],
    );
}

#[test]
#[serial]
fn vectored_client_exits_cleanly_when_server_dies() {
    run_pair(
        (env!("CARGO_BIN_EXE_tcp_server_writev"), &["64", PORT, "4096"]),
        &[(
            env!("CARGO_BIN_EXE_tcp_client_readv"),
            &["127.0.0.1", PORT, "64", "4096"],
        )],
    );
}

#[test]
#[serial]
fn tokio_server_feeds_several_clients() {
    let client_args: &[&str] = &["1", "1", PORT, "4096"];
    run_pair(
        (env!("CARGO_BIN_EXE_tokio_server"), &["2", "0", PORT, "4096"]),
        &[
            (env!("CARGO_BIN_EXE_tokio_client"), client_args),
            (env!("CARGO_BIN_EXE_tokio_client"), client_args),
        ],
    );
}

#[test]
fn missing_arguments_print_usage_and_fail() {
    let cases: &[(&str, &[&str])] = &[
        (env!("CARGO_BIN_EXE_tcp_server"), &["1990"]),
        (env!("CARGO_BIN_EXE_tcp_server_writev"), &["64", "1990"]),
        (env!("CARGO_BIN_EXE_tcp_client"), &[]),
        (env!("CARGO_BIN_EXE_tcp_client_readv"), &["127.0.0.1", "1990", "64"]),
        (env!("CARGO_BIN_EXE_tokio_server"), &["1", "0", "1990"]),
        (env!("CARGO_BIN_EXE_tokio_client"), &["1", "0", "1990"]),
    ];

    for (bin, args) in cases {
        let output = Command::new(bin).args(*args).output().unwrap();
        assert!(!output.status.success(), "{} {:?} succeeded", bin, args);
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Usage:"), "no usage from {}: {}", bin, stderr);
        // Arguments are rejected before any setup step is logged.
        assert!(output.stdout.is_empty());
    }
}

#[test]
fn oversized_payload_is_a_usage_error() {
    let cases: &[(&str, &[&str])] = &[
        (
            env!("CARGO_BIN_EXE_tcp_server_writev"),
            &["1024", "1990", "18446744073709551615"],
        ),
        (
            env!("CARGO_BIN_EXE_tcp_client_readv"),
            &["127.0.0.1", "1990", "1024", "2097152"],
        ),
    ];

    for (bin, args) in cases {
        let output = Command::new(bin).args(*args).output().unwrap();
        assert_eq!(output.status.code(), Some(2), "{} {:?}", bin, args);
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("exceeds the limit"), "{}: {}", bin, stderr);
        assert!(output.stdout.is_empty());
    }
}

#[test]
fn bind_failure_is_logged_and_fails() {
    // The port is held by a listening socket, so reuse-addr does not help.
    let holder = TcpListener::bind((Ipv4Addr::UNSPECIFIED, 0)).unwrap();
    let port = holder.local_addr().unwrap().port().to_string();

    for (bin, args) in [
        (env!("CARGO_BIN_EXE_tcp_server"), vec![port.as_str(), "4096"]),
        (
            env!("CARGO_BIN_EXE_tcp_server_writev"),
            vec!["64", port.as_str(), "4096"],
        ),
    ] {
        let output = Command::new(bin).args(&args).output().unwrap();
        assert!(!output.status.success(), "{} {:?} succeeded", bin, args);

        let stdout = String::from_utf8_lossy(&output.stdout);
        let expected = format!("bind socket to 0.0.0.0:{} error", port);
        assert!(stdout.contains(&expected), "{} stdout: {}", bin, stdout);
        assert!(stdout.contains("ERROR"), "{} stdout: {}", bin, stdout);
        // Not a terminal, so no color codes.
        assert!(!stdout.contains('\x1b'), "{} stdout: {}", bin, stdout);
    }
    drop(holder);
}
