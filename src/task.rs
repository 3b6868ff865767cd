//! Runs the network effects the dashboard asks for.
//!
//! The dashboard never awaits anything itself: it hands out [`Fetch`]
//! descriptions and receives the outcome back as a [`Message`], carrying the
//! ticket it issued so late answers can be recognised.

use data::{EventTicket, FetchTicket};
use service::{DataSource, EventQuery, MetricQuery};

use crate::screen::dashboard::Message;

#[derive(Debug, Clone, PartialEq)]
pub enum Fetch {
    Metric {
        ticket: FetchTicket,
        query: MetricQuery,
    },
    Events {
        ticket: EventTicket,
        query: EventQuery,
    },
}

pub async fn perform<S: DataSource>(source: &S, fetch: Fetch) -> Message {
    match fetch {
        Fetch::Metric { ticket, query } => {
            let result = source
                .fetch_metric(&query)
                .await
                .map_err(|err| err.to_string());

            Message::MetricFetched(ticket, result)
        }
        Fetch::Events { ticket, query } => {
            let result = source
                .fetch_events(&query)
                .await
                .map_err(|err| err.to_string());

            Message::EventsFetched(ticket, result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data::{MetricSeriesStore, TimeWindow};
    use rustc_hash::FxHashMap;
    use service::{EventMarker, Series};

    #[derive(Default)]
    struct Memory {
        series: FxHashMap<String, Vec<Series>>,
        events: Vec<EventMarker>,
    }

    impl DataSource for Memory {
        async fn fetch_metric(&self, query: &MetricQuery) -> Result<Vec<Series>, service::Error> {
            self.series
                .get(&query.target)
                .cloned()
                .ok_or(service::Error::Status(404))
        }

        async fn fetch_events(
            &self,
            _query: &EventQuery,
        ) -> Result<Vec<EventMarker>, service::Error> {
            Ok(self.events.clone())
        }
    }

    fn query(target: &str) -> MetricQuery {
        MetricQuery {
            target: target.to_string(),
            from: "00%3A00_20240101".to_string(),
            until: "00%3A00_20240102".to_string(),
        }
    }

    #[tokio::test]
    async fn metric_fetch_carries_its_ticket_back() {
        let window = TimeWindow::new(1000, 2000).unwrap();
        let mut store = MetricSeriesStore::new();
        let ticket = store.add_metric("server.load", window).unwrap();

        let mut source = Memory::default();
        source.series.insert(
            "server.load".to_string(),
            vec![Series::new("server.load", vec![(1_000_000, 1.0)])],
        );

        let message = perform(
            &source,
            Fetch::Metric {
                ticket: ticket.clone(),
                query: query("server.load"),
            },
        )
        .await;

        match message {
            Message::MetricFetched(returned, Ok(series)) => {
                assert_eq!(returned, ticket);
                assert_eq!(series[0].points, vec![(1_000_000, 1.0)]);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn source_errors_become_messages() {
        let window = TimeWindow::new(1000, 2000).unwrap();
        let mut store = MetricSeriesStore::new();
        let ticket = store.add_metric("missing", window).unwrap();

        let message = perform(
            &Memory::default(),
            Fetch::Metric {
                ticket,
                query: query("missing"),
            },
        )
        .await;

        assert!(matches!(
            message,
            Message::MetricFetched(_, Err(reason)) if reason.contains("404")
        ));
    }

    #[tokio::test]
    async fn event_fetch_returns_markers() {
        let window = TimeWindow::new(1000, 2000).unwrap();
        let mut events = data::EventSet::new();
        let ticket = events.request(window);
        let source = Memory {
            events: vec![EventMarker {
                timestamp_ms: 1_500_000,
                label: "deploy".to_string(),
                id: 3,
            }],
            ..Memory::default()
        };

        let message = perform(
            &source,
            Fetch::Events {
                ticket,
                query: EventQuery {
                    from: "a".to_string(),
                    until: "b".to_string(),
                    tags: vec![],
                },
            },
        )
        .await;

        assert!(matches!(
            message,
            Message::EventsFetched(_, Ok(markers)) if markers.len() == 1
        ));
    }
}
