// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use chipdeck_app::Ticket;
use chipdeck_client::Client;
use chipdeck_tui::{FetchRequest, Fetched, InternalEvent, Slot};
use std::sync::mpsc::Sender;
use std::thread;

pub struct EngineRuntime {
    client: Client,
}

impl EngineRuntime {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn execute(client: &Client, request: &FetchRequest) -> Result<Fetched> {
    Ok(match request {
        FetchRequest::Health => Fetched::Engine(client.health()?),
        FetchRequest::Databases => Fetched::Databases(client.list_databases()?),
        FetchRequest::Tables { database } => Fetched::Tables(client.list_tables(database)?),
        FetchRequest::Columns { database, table } => {
            Fetched::Columns(client.describe_table(database, table)?)
        }
        FetchRequest::Chips => Fetched::Chips(client.list_chips()?),
        FetchRequest::CreateChip(chip) => Fetched::Created(client.create_chip(chip)?),
        FetchRequest::DeleteChips(ids) => {
            for (done, id) in ids.iter().enumerate() {
                client.delete_chip(*id).with_context(|| {
                    format!("delete chip {id} ({done} of {} already deleted)", ids.len())
                })?;
            }
            Fetched::Deleted(ids.len())
        }
        FetchRequest::Query(query) => Fetched::Rows(client.run_query(query)?),
    })
}

impl chipdeck_tui::AppRuntime for EngineRuntime {
    fn base_url(&self) -> String {
        self.client.base_url().to_owned()
    }

    fn connect(&mut self, base_url: &str) -> Result<()> {
        self.client = self
            .client
            .with_base_url(base_url)
            .context("check the engine URL")?;
        Ok(())
    }

    fn fetch(&mut self, request: &FetchRequest) -> Result<Fetched> {
        execute(&self.client, request)
    }

    /// Each request runs on its own thread so the UI keeps drawing; the
    /// loaders sort out ordering by generation.
    fn spawn_fetch(
        &mut self,
        slot: Slot,
        ticket: Ticket,
        request: FetchRequest,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let client = self.client.clone();
        thread::Builder::new()
            .name(format!("fetch-{slot:?}-{}", ticket.generation).to_lowercase())
            .spawn(move || {
                let result = execute(&client, &request).map_err(|error| format!("{error:#}"));
                // The receiver is gone once the UI has exited.
                let _ = tx.send(InternalEvent::Fetched {
                    slot,
                    generation: ticket.generation,
                    result,
                });
            })
            .map(|_| ())
            .map_err(|error| anyhow!("spawn fetch thread: {error}"))
    }
}

#[cfg(test)]
mod tests {
    use super::EngineRuntime;
    use anyhow::Result;
    use chipdeck_app::{ChipId, Ticket};
    use chipdeck_client::Client;
    use chipdeck_tui::{AppRuntime, FetchRequest, Fetched, InternalEvent, Slot};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;
    use tiny_http::{Header, Response, Server};

    fn json_header() -> Header {
        Header::from_bytes("Content-Type", "application/json").expect("static header")
    }

    /// Answers `count` requests with `respond(method, path)`.
    fn serve(
        count: usize,
        respond: impl Fn(&str, &str) -> (u16, String) + Send + 'static,
    ) -> Result<(String, thread::JoinHandle<Vec<String>>)> {
        let server = Server::http("127.0.0.1:0").map_err(|error| anyhow::anyhow!("{error}"))?;
        let url = format!("http://{}", server.server_addr());
        let handle = thread::spawn(move || {
            let mut seen = Vec::new();
            for _ in 0..count {
                let Ok(request) = server.recv() else {
                    break;
                };
                let method = request.method().to_string();
                let path = request.url().to_owned();
                let (status, body) = respond(&method, &path);
                seen.push(format!("{method} {path}"));
                let response = Response::from_string(body)
                    .with_status_code(status)
                    .with_header(json_header());
                let _ = request.respond(response);
            }
            seen
        });
        Ok((url, handle))
    }

    fn client(url: &str) -> Result<Client> {
        Client::new(url, Duration::from_secs(2))
    }

    #[test]
    fn fetch_maps_requests_to_engine_calls() -> Result<()> {
        let (url, handle) = serve(2, |_, path| match path {
            "/health" => (200, r#"{"name":"mock","version":"1.2.3"}"#.to_owned()),
            _ => (200, r#"[{"name":"sales","table_count":2}]"#.to_owned()),
        })?;
        let mut runtime = EngineRuntime::new(client(&url)?);

        let Fetched::Engine(info) = runtime.fetch(&FetchRequest::Health)? else {
            panic!("expected engine info");
        };
        assert_eq!(info.version, "1.2.3");
        let Fetched::Databases(databases) = runtime.fetch(&FetchRequest::Databases)? else {
            panic!("expected databases");
        };
        assert_eq!(databases[0].name, "sales");

        let seen = handle.join().expect("server thread");
        assert_eq!(seen, vec!["GET /health", "GET /databases"]);
        Ok(())
    }

    #[test]
    fn delete_stops_at_first_failure_with_progress() -> Result<()> {
        let (url, handle) = serve(2, |_, path| match path {
            "/chips/1" => (204, String::new()),
            _ => (404, r#"{"error":"no such chip"}"#.to_owned()),
        })?;
        let mut runtime = EngineRuntime::new(client(&url)?);

        let error = runtime
            .fetch(&FetchRequest::DeleteChips(vec![
                ChipId::new(1),
                ChipId::new(2),
                ChipId::new(3),
            ]))
            .expect_err("second delete fails");
        let message = format!("{error:#}");
        assert!(message.contains("delete chip 2 (1 of 3 already deleted)"), "{message}");
        assert!(message.contains("no such chip"), "{message}");

        let seen = handle.join().expect("server thread");
        assert_eq!(seen, vec!["DELETE /chips/1", "DELETE /chips/2"]);
        Ok(())
    }

    #[test]
    fn connect_validates_and_switches_engine() -> Result<()> {
        let mut runtime = EngineRuntime::new(client("http://127.0.0.1:1")?);
        let error = runtime.connect("not a url").expect_err("bad url");
        assert!(format!("{error:#}").contains("check the engine URL"));
        assert_eq!(runtime.base_url(), "http://127.0.0.1:1");

        runtime.connect("http://engine.test:7878/")?;
        assert_eq!(runtime.base_url(), "http://engine.test:7878");
        Ok(())
    }

    #[test]
    fn spawned_fetch_reports_generation_on_the_channel() -> Result<()> {
        let (url, handle) = serve(1, |_, _| (200, "[]".to_owned()))?;
        let mut runtime = EngineRuntime::new(client(&url)?);
        let (tx, rx) = mpsc::channel();

        runtime.spawn_fetch(
            Slot::Chips,
            Ticket { generation: 7 },
            FetchRequest::Chips,
            tx,
        )?;
        let event = rx.recv_timeout(Duration::from_secs(5))?;
        assert_eq!(
            event,
            InternalEvent::Fetched {
                slot: Slot::Chips,
                generation: 7,
                result: Ok(Fetched::Chips(Vec::new())),
            }
        );
        handle.join().expect("server thread");
        Ok(())
    }

    #[test]
    fn spawned_fetch_reports_errors_as_text() -> Result<()> {
        let mut runtime = EngineRuntime::new(client("http://127.0.0.1:1")?);
        let (tx, rx) = mpsc::channel();

        runtime.spawn_fetch(
            Slot::Main,
            Ticket { generation: 3 },
            FetchRequest::Health,
            tx,
        )?;
        let InternalEvent::Fetched {
            generation, result, ..
        } = rx.recv_timeout(Duration::from_secs(5))?
        else {
            panic!("expected fetch result");
        };
        assert_eq!(generation, 3);
        let error = result.expect_err("nothing listens on port 1");
        assert!(error.contains("cannot reach http://127.0.0.1:1"), "{error}");
        Ok(())
    }
}
