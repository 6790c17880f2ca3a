//! Minimal HTTP/1.1 surface for the leaderboard routes.
//!
//! Request handling is a pure function from parsed request plus store to
//! response; the socket loop in `main` stays a thin shell around it.
use serde::Serialize;
use serde_json::json;

use crate::schema::ScoreDraft;
use crate::storage::ScoreStore;

pub const LEADERBOARD_PATH: &str = "/api/leaderboard";

/// A parsed incoming request; only what the routes need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl Request {
    /// Parse a raw HTTP/1.1 request buffer.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (head, body) = match raw.split_once("\r\n\r\n") {
            Some((head, body)) => (head, body),
            None => (raw, ""),
        };
        let request_line = head.lines().next()?;
        let mut parts = request_line.split_whitespace();
        let method = parts.next()?.to_string();
        let path = parts.next()?.to_string();
        // Ignore query strings; the routes take none.
        let path = path.split('?').next().unwrap_or(&path).to_string();
        Some(Self {
            method,
            path,
            body: body.to_string(),
        })
    }

    /// Content-Length declared by the header block, if any.
    #[must_use]
    pub fn content_length(head: &str) -> usize {
        head.lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse().ok())?
            })
            .unwrap_or(0)
    }
}

/// An outgoing response, rendered to the wire by `to_bytes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        Self {
            status,
            body: serde_json::to_string(value).unwrap_or_else(|_| String::from("{}")),
        }
    }

    fn message(status: u16, message: &str) -> Self {
        Self::json(status, &json!({ "message": message }))
    }

    #[must_use]
    pub fn no_content() -> Self {
        Self {
            status: 204,
            body: String::new(),
        }
    }

    const fn status_text(status: u16) -> &'static str {
        match status {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            400 => "Bad Request",
            404 => "Not Found",
            _ => "Internal Server Error",
        }
    }

    /// Render the full HTTP/1.1 response.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!(
            "HTTP/1.1 {} {}\r\nAccess-Control-Allow-Origin: *\r\n\
             Access-Control-Allow-Methods: POST, GET, OPTIONS\r\n\
             Access-Control-Allow-Headers: Content-Type\r\n\
             Connection: close\r\n",
            self.status,
            Self::status_text(self.status)
        );
        if self.body.is_empty() {
            head.push_str("\r\n");
            return head.into_bytes();
        }
        head.push_str(&format!(
            "Content-Type: application/json\r\nContent-Length: {}\r\n\r\n",
            self.body.len()
        ));
        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(self.body.as_bytes());
        bytes
    }
}

/// Route a parsed request against the score store.
pub fn handle_request(request: &Request, store: &dyn ScoreStore) -> Response {
    match (request.method.as_str(), request.path.as_str()) {
        ("OPTIONS", _) => Response::no_content(),
        ("GET", LEADERBOARD_PATH) => match store.leaderboard() {
            Ok(rows) => Response::json(200, &rows),
            Err(err) => {
                log::error!("leaderboard read failed: {err}");
                Response::message(500, "Failed to fetch leaderboard")
            }
        },
        ("POST", LEADERBOARD_PATH) => {
            let draft: ScoreDraft = match serde_json::from_str(&request.body) {
                Ok(draft) => draft,
                Err(err) => {
                    return Response::json(
                        400,
                        &json!({ "message": format!("invalid JSON body: {err}"), "field": "body" }),
                    );
                }
            };
            let submission = match draft.validate() {
                Ok(submission) => submission,
                Err(err) => return Response::json(400, &err),
            };
            match store.create(submission) {
                Ok(record) => Response::json(201, &record),
                Err(err) => {
                    log::error!("score insert failed: {err}");
                    Response::message(500, "Failed to submit score")
                }
            }
        }
        _ => Response::message(404, "Not found"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ScoreRecord;
    use crate::storage::MemoryStore;

    fn post(body: &str) -> Request {
        Request {
            method: String::from("POST"),
            path: String::from(LEADERBOARD_PATH),
            body: body.to_string(),
        }
    }

    fn get() -> Request {
        Request {
            method: String::from("GET"),
            path: String::from(LEADERBOARD_PATH),
            body: String::new(),
        }
    }

    #[test]
    fn parse_splits_request_line_and_body() {
        let raw = "POST /api/leaderboard?x=1 HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: 2\r\n\r\n{}";
        let request = Request::parse(raw).expect("parse");
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, LEADERBOARD_PATH);
        assert_eq!(request.body, "{}");
        assert_eq!(Request::content_length(raw), 2);
    }

    #[test]
    fn post_then_get_roundtrips_a_record() {
        let store = MemoryStore::new();
        let created = handle_request(
            &post(r#"{"playerName":"AAA","survivedNights":2,"remainingEnergy":55}"#),
            &store,
        );
        assert_eq!(created.status, 201);
        let record: ScoreRecord = serde_json::from_str(&created.body).expect("record json");
        assert_eq!(record.player_name, "AAA");
        assert!(record.id > 0);

        let listed = handle_request(&get(), &store);
        assert_eq!(listed.status, 200);
        let rows: Vec<ScoreRecord> = serde_json::from_str(&listed.body).expect("rows json");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, record.id);
    }

    #[test]
    fn higher_nights_sort_first_after_a_second_post() {
        let store = MemoryStore::new();
        handle_request(
            &post(r#"{"playerName":"AAA","survivedNights":2,"remainingEnergy":55}"#),
            &store,
        );
        handle_request(
            &post(r#"{"playerName":"BBB","survivedNights":3,"remainingEnergy":1}"#),
            &store,
        );

        let listed = handle_request(&get(), &store);
        let rows: Vec<ScoreRecord> = serde_json::from_str(&listed.body).expect("rows json");
        assert_eq!(rows[0].player_name, "BBB");
        assert_eq!(rows[1].player_name, "AAA");
    }

    #[test]
    fn validation_faults_return_400_with_field() {
        let store = MemoryStore::new();
        let response = handle_request(
            &post(r#"{"survivedNights":2,"remainingEnergy":55}"#),
            &store,
        );
        assert_eq!(response.status, 400);
        assert!(response.body.contains("\"field\":\"playerName\""));

        let response = handle_request(&post("not json"), &store);
        assert_eq!(response.status, 400);
    }

    #[test]
    fn unknown_routes_return_404_and_options_204() {
        let store = MemoryStore::new();
        let request = Request {
            method: String::from("GET"),
            path: String::from("/api/unknown"),
            body: String::new(),
        };
        assert_eq!(handle_request(&request, &store).status, 404);

        let preflight = Request {
            method: String::from("OPTIONS"),
            path: String::from(LEADERBOARD_PATH),
            body: String::new(),
        };
        let response = handle_request(&preflight, &store);
        assert_eq!(response.status, 204);
        assert!(String::from_utf8(response.to_bytes())
            .expect("utf8")
            .starts_with("HTTP/1.1 204 No Content"));
    }
}
