use std::io::Read;
use std::net::{Ipv4Addr, TcpListener};
use std::process::{Command, Stdio};
use std::time::Duration;

use wait_timeout::ChildExt;

const TIMEOUT: Duration = Duration::from_secs(30);

/// Runs the binary and returns its exit code and stdout.
fn run_rangescan(args: &[&str]) -> (i32, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_rangescan"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let status = match child.wait_timeout(TIMEOUT).unwrap() {
        Some(status) => status,
        None => {
            child.kill().unwrap();
            panic!("rangescan {args:?} did not finish within {TIMEOUT:?}");
        }
    };

    let mut stdout = String::new();
    child
        .stdout
        .take()
        .unwrap()
        .read_to_string(&mut stdout)
        .unwrap();
    (status.code().unwrap(), stdout)
}

#[test]
fn wrong_argument_count_exits_with_one() {
    assert_eq!(run_rangescan(&[]).0, 1);
    assert_eq!(run_rangescan(&["127.0.0.1"]).0, 1);
    assert_eq!(run_rangescan(&["127.0.0.1", "1"]).0, 1);
    assert_eq!(run_rangescan(&["127.0.0.1", "1", "2", "3"]).0, 1);
}

#[test]
fn unparsable_port_exits_with_one() {
    assert_eq!(run_rangescan(&["127.0.0.1", "one", "10"]).0, 1);
    assert_eq!(run_rangescan(&["127.0.0.1", "1", "65536"]).0, 1);
}

#[test]
fn reversed_range_exits_with_one() {
    let (code, stdout) = run_rangescan(&["127.0.0.1", "500", "100"]);
    assert_eq!(code, 1);
    assert_eq!(stdout.trim(), "Invalid port range");
}

#[test]
fn help_exits_with_zero() {
    let (code, stdout) = run_rangescan(&["--help"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Example: rangescan google.com 1 1000"));
}

#[test]
fn report_lists_the_open_port() {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    let port = listener.local_addr().unwrap().port().to_string();

    let (code, stdout) = run_rangescan(&["127.0.0.1", &port, &port]);

    assert_eq!(code, 0);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        [
            format!("Scanning 127.0.0.1 ports {port}-{port} with 1 threads..."),
            String::new(),
            "Open ports on 127.0.0.1:".to_owned(),
            format!("Port {port} is open"),
            "Scan completed. Found 1 open ports.".to_owned(),
        ]
    );
}

#[test]
fn no_open_ports_is_still_success() {
    let port = {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        listener.local_addr().unwrap().port().to_string()
    };

    let (code, stdout) = run_rangescan(&["127.0.0.1", &port, &port]);

    assert_eq!(code, 0);
    assert!(stdout.ends_with("Scan completed. Found 0 open ports.\n"));
}

#[test]
fn greppable_prints_only_ports() {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    let port = listener.local_addr().unwrap().port().to_string();

    let (code, stdout) = run_rangescan(&["127.0.0.1", &port, &port, "--greppable"]);

    assert_eq!(code, 0);
    assert_eq!(stdout, format!("127.0.0.1 -> [{port}]\n"));
}

#[test]
fn json_report() {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    let port = listener.local_addr().unwrap().port();
    let arg = port.to_string();

    let (code, stdout) = run_rangescan(&["127.0.0.1", &arg, &arg, "--json"]);

    assert_eq!(code, 0);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["open_ports"], serde_json::json!([port]));
    assert_eq!(report["total_open"], 1);
    assert_eq!(report["worker_count"], 1);
}
