//! 200 OK responses.
use std::io::prelude::*;

#[cfg(feature = "json")]
use crate::content::{json, APPLICATION_JSON};
use crate::content::TEXT_PLAIN;
use crate::response::{internal_error, status, ResponseWriter};

/// 200 with no body and no *Content-Type*.
pub fn empty_ok(response: &mut ResponseWriter<'_>) {
    response.write_header(status::OK);
}

/// 200 with `text` as a `text/plain` body, written as is.
///
/// If writing fails the response falls back to [`internal_error`], which
/// cannot change a status that has already been decided.
pub fn text_ok(response: &mut ResponseWriter<'_>, text: &str) {
    response.set_header("Content-Type", TEXT_PLAIN);
    if let Err(e) = response.write_all(text.as_bytes()) {
        internal_error(response, Some(&e));
    }
}

/// 200 with `value` serialized as an `application/json` body.
///
/// A value that serializes to `null` (such as `()` or `None`) gives the
/// same response as [`empty_ok`]. If serialization fails the response is
/// [`internal_error`] with the serializer's message.
///
/// ```
/// use apiutil::response::{json_ok, ResponseWriter};
///
/// let mut out = vec![];
/// let mut response = ResponseWriter::new(&mut out);
/// json_ok(&mut response, &vec![1, 2, 3]);
/// response.finish().unwrap();
///
/// assert!(String::from_utf8(out).unwrap().ends_with("\r\n\r\n[1,2,3]"));
/// ```
#[cfg(feature = "json")]
pub fn json_ok<T>(response: &mut ResponseWriter<'_>, value: &T)
where
    T: serde::Serialize + ?Sized,
{
    let bytes = match json::to_vec(value) {
        Ok(bytes) => bytes,
        Err(e) => {
            internal_error(response, Some(&e));
            return;
        }
    };
    if bytes == b"null" {
        empty_ok(response);
        return;
    }
    response.set_header("Content-Type", APPLICATION_JSON);
    if let Err(e) = response.write_all(&bytes) {
        internal_error(response, Some(&e));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::response::test::BrokenPipe;
    use crate::testing::Recorded;

    fn record<F>(f: F) -> Recorded
    where
        F: FnOnce(&mut ResponseWriter<'_>),
    {
        let mut out = vec![];
        let mut response = ResponseWriter::new(&mut out);
        f(&mut response);
        response.finish().unwrap();
        Recorded::parse(&out).unwrap()
    }

    #[test]
    fn test_empty_ok() {
        let recorded = record(empty_ok);
        assert_eq!(recorded.status_code, 200);
        assert_eq!(recorded.reason, "OK");
        assert_eq!(recorded.header("Content-Type"), None);
        assert!(recorded.body.is_empty());
    }

    #[test]
    fn test_text_ok() {
        let recorded = record(|w| text_ok(w, "Hello, world"));
        assert_eq!(recorded.status_code, 200);
        assert_eq!(recorded.header("Content-Type"), Some(TEXT_PLAIN));
        assert_eq!(recorded.text(), "Hello, world");
    }

    #[test]
    fn test_text_ok_write_failure() {
        let mut broken = BrokenPipe;
        let mut response = ResponseWriter::with_buffer_size(&mut broken, 0);
        text_ok(&mut response, "lost");
        // Status was decided by the failed write, fallback cannot change it.
        assert_eq!(response.status_code(), Some(200));
        assert_eq!(response.header("Content-Type"), Some(TEXT_PLAIN));
    }

    #[cfg(feature = "json")]
    mod json_body {
        use super::*;
        use std::collections::HashMap;

        #[derive(serde::Serialize)]
        struct Person {
            name: String,
            age: u16,
        }

        #[test]
        fn test_json_ok() {
            let person = Person {
                name: "Bob".to_string(),
                age: 42,
            };
            let recorded = record(|w| json_ok(w, &person));
            assert_eq!(recorded.status_code, 200);
            assert_eq!(recorded.header("Content-Type"), Some(APPLICATION_JSON));
            assert_eq!(recorded.text(), r#"{"name":"Bob","age":42}"#);
        }

        #[test]
        fn test_json_ok_null_is_empty_ok() {
            let empty = record(empty_ok);
            let none: Option<Person> = None;
            for recorded in vec![record(|w| json_ok(w, &none)), record(|w| json_ok(w, &()))] {
                assert_eq!(recorded, empty);
            }
        }

        #[test]
        fn test_json_ok_serialization_failure() {
            let mut map = HashMap::new();
            map.insert(vec![1u8, 2], "value");
            let recorded = record(|w| json_ok(w, &map));
            assert_eq!(recorded.status_code, 500);
            assert_eq!(
                recorded.text(),
                "Internal Server Error key must be a string\n"
            );
        }

        #[test]
        fn test_json_ok_write_failure() {
            let mut broken = BrokenPipe;
            let mut response = ResponseWriter::with_buffer_size(&mut broken, 0);
            json_ok(&mut response, &[1, 2, 3]);
            assert_eq!(response.status_code(), Some(200));
            assert!(response.is_committed());
        }
    }
}
