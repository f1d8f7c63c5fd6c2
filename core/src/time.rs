// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Time related utils.

use crate::Error;
use chrono::SecondsFormat;
use chrono::Utc;

/// DateTime is the alias of chrono `DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into RFC 3339 with second precision: `2022-03-13T07:20:04Z`
pub fn format_rfc3339(t: DateTime) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse RFC 3339 time into UTC datetime.
///
/// Any offset is accepted and normalized to UTC.
pub fn parse_rfc3339(s: &str) -> crate::Result<DateTime> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            Error::request_invalid(format!("parse '{s}' as rfc3339 failed")).with_source(e)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    fn test_time() -> DateTime {
        Utc.with_ymd_and_hms(2022, 3, 1, 8, 12, 34).unwrap()
    }

    #[test]
    fn test_format_rfc3339() {
        assert_eq!(format_rfc3339(test_time()), "2022-03-01T08:12:34Z");
    }

    #[test]
    fn test_format_rfc3339_drops_subseconds() {
        let t = test_time() + chrono::TimeDelta::milliseconds(999);
        assert_eq!(format_rfc3339(t), "2022-03-01T08:12:34Z");
    }

    #[test_case("2022-03-01T08:12:34Z"; "utc")]
    #[test_case("2022-03-01T09:12:34+01:00"; "positive offset")]
    #[test_case("2022-03-01T03:12:34-05:00"; "negative offset")]
    fn test_parse_rfc3339(input: &str) {
        assert_eq!(parse_rfc3339(input).unwrap(), test_time());
    }

    #[test]
    fn test_parse_rfc3339_invalid() {
        let err = parse_rfc3339("Tue, 01 Mar 2022 08:12:34 GMT").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::RequestInvalid);
    }
}
