#![allow(dead_code)]

pub mod http_helpers {
    use http::{Method, Request, Response};

    /// Build a request with the given headers and body.
    pub fn request(
        method: Method,
        path: &str,
        headers: &[(&str, &str)],
        body: &[u8],
    ) -> Request<Vec<u8>> {
        let mut builder = Request::builder().method(method).uri(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(body.to_vec()).unwrap()
    }

    /// Body-less request without headers.
    pub fn bare(method: Method, path: &str) -> Request<Vec<u8>> {
        request(method, path, &[], b"")
    }

    pub fn body_text(response: &Response<Vec<u8>>) -> String {
        String::from_utf8_lossy(response.body()).into_owned()
    }

    pub fn header<'r>(response: &'r Response<Vec<u8>>, name: &str) -> Option<&'r str> {
        response.headers().get(name).and_then(|v| v.to_str().ok())
    }
}

pub mod routes {
    use cable::{RequestEntity, ResponseEntity, Router};
    use http::StatusCode;

    /// Handler answering 200 with a fixed text body.
    pub fn reply(
        body: &'static str,
    ) -> impl Fn(&RequestEntity, &mut ResponseEntity) + Send + Sync + 'static {
        move |_req: &RequestEntity, res: &mut ResponseEntity| {
            res.set_status(StatusCode::OK);
            res.set_body(body);
        }
    }

    /// The `/persons` resource with all five methods.
    pub fn persons_router() -> Router {
        let mut router = Router::new();
        router
            .get("/persons", |_req: &RequestEntity, res: &mut ResponseEntity| {
                res.set_status(StatusCode::OK);
            })
            .unwrap()
            .post("/persons", reply("Some Persons"))
            .unwrap()
            .put("/persons", reply("Put Some Persons"))
            .unwrap()
            .patch("/persons", reply("Patched Some Persons"))
            .unwrap()
            .delete("/persons", reply("Deleted Some Persons"))
            .unwrap();
        router
    }
}

pub mod tracing_capture {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing::subscriber::DefaultGuard;
    use tracing_subscriber::fmt::MakeWriter;

    /// In-memory sink for formatted log lines.
    #[derive(Clone, Default)]
    pub struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Route this thread's events into a buffer until the guard drops.
    pub struct TestTracing {
        pub logs: Captured,
        _guard: DefaultGuard,
    }

    impl TestTracing {
        pub fn init() -> Self {
            let logs = Captured::default();
            let subscriber = tracing_subscriber::fmt()
                .with_max_level(tracing::Level::DEBUG)
                .with_ansi(false)
                .with_writer(logs.clone())
                .finish();
            let guard = tracing::subscriber::set_default(subscriber);
            Self {
                logs,
                _guard: guard,
            }
        }
    }
}
