// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use chipdeck_app::{ChipId, NewChip, QueryRequest};
use chipdeck_client::Client;
use std::io::Read;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Method, Response, Server};

fn json_response(body: &str, status: u16) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(status)
        .with_header(
            Header::from_bytes("Content-Type", "application/json")
                .expect("valid content type header"),
        )
}

#[test]
fn unreachable_engine_error_is_actionable() {
    let client = Client::new("http://127.0.0.1:1", Duration::from_millis(50))
        .expect("client should initialize");

    let error = client
        .health()
        .expect_err("health should fail for unreachable engine");
    let message = error.to_string();
    assert!(message.contains("cannot reach http://127.0.0.1:1"));
    assert!(message.contains("is the engine running?"));
}

#[test]
fn health_and_catalog_calls_hit_expected_paths() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let expected = [
            ("/health", r#"{"name":"chipd","version":"0.4.2"}"#),
            ("/databases", r#"[{"name":"sales","table_count":2}]"#),
            (
                "/databases/sales/tables",
                r#"[{"name":"orders","row_count":500},{"name":"items","row_count":12}]"#,
            ),
            (
                "/databases/sales/tables/orders/columns",
                r#"[{"name":"id","data_type":"int","nullable":false}]"#,
            ),
        ];
        for (path, body) in expected {
            let request = server.recv().expect("request expected");
            assert_eq!(request.method(), &Method::Get);
            assert_eq!(request.url(), path);
            request
                .respond(json_response(body, 200))
                .expect("response should succeed");
        }
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let info = client.health()?;
    assert_eq!(info.name, "chipd");
    assert_eq!(info.version, "0.4.2");

    let databases = client.list_databases()?;
    assert_eq!(databases.len(), 1);
    assert_eq!(databases[0].table_count, 2);

    let tables = client.list_tables("sales")?;
    assert_eq!(tables[0].name, "orders");
    assert_eq!(tables[0].row_count, 500);

    let columns = client.describe_table("sales", "orders")?;
    assert_eq!(columns[0].data_type, "int");
    assert!(!columns[0].nullable);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn create_and_delete_chip_round_trip_through_engine() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/", server.server_addr());

    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("create request expected");
        assert_eq!(request.method(), &Method::Post);
        assert_eq!(request.url(), "/chips");
        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("read request body");
        let payload: serde_json::Value = serde_json::from_str(&body).expect("json body");
        assert_eq!(payload["name"], "weekly");
        assert_eq!(payload["tables"][0], "orders");
        request
            .respond(json_response(
                r#"{"id":7,"name":"weekly","database":"sales","tables":["orders"],
                    "created_at":"2026-03-04T10:00:00Z","description":""}"#,
                201,
            ))
            .expect("response should succeed");

        let request = server.recv().expect("delete request expected");
        assert_eq!(request.method(), &Method::Delete);
        assert_eq!(request.url(), "/chips/7");
        request
            .respond(Response::empty(204))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let chip = client.create_chip(&NewChip {
        name: "weekly".to_owned(),
        database: "sales".to_owned(),
        tables: vec!["orders".to_owned()],
        description: String::new(),
    })?;
    assert_eq!(chip.id, ChipId::new(7));
    assert_eq!(chip.detail(), "sales.orders");

    client.delete_chip(chip.id)?;

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn invalid_chip_is_rejected_before_sending() {
    let client = Client::new("http://127.0.0.1:1", Duration::from_millis(50))
        .expect("client should initialize");
    let error = client
        .create_chip(&NewChip {
            name: "weekly".to_owned(),
            database: "sales".to_owned(),
            tables: Vec::new(),
            description: String::new(),
        })
        .expect_err("empty table selection should fail");
    assert!(error.to_string().contains("select at least one table"));
}

#[test]
fn engine_error_envelope_is_surfaced() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/query");
        request
            .respond(json_response(
                r#"{"error":"syntax error near \"FORM\""}"#,
                400,
            ))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .run_query(&QueryRequest {
            database: "sales".to_owned(),
            chip: None,
            sql: "SELECT * FORM orders".to_owned(),
        })
        .expect_err("query should fail");
    assert_eq!(
        error.to_string(),
        "engine error (400): syntax error near \"FORM\""
    );

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn query_result_rejects_ragged_rows() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        for body in [
            r#"{"columns":["id","total"],"rows":[["1","9.50"],["2","3.25"]]}"#,
            r#"{"columns":["id","total"],"rows":[["1"]]}"#,
        ] {
            let request = server.recv().expect("request expected");
            request
                .respond(json_response(body, 200))
                .expect("response should succeed");
        }
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let request = QueryRequest {
        database: "sales".to_owned(),
        chip: Some(ChipId::new(3)),
        sql: "SELECT id, total FROM orders".to_owned(),
    };
    let result = client.run_query(&request)?;
    assert_eq!(result.columns, vec!["id".to_owned(), "total".to_owned()]);
    assert_eq!(result.rows.len(), 2);

    let error = client.run_query(&request).expect_err("ragged rows");
    assert!(error.to_string().contains("1 cells for 2 columns"));

    handle.join().expect("server thread should join");
    Ok(())
}
