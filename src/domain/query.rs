use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;

/// Raw listing parameters as they arrive on the query string. Shared by the
/// owner route (which additionally requires `userEmail`) and the moderator
/// route (which ignores it).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageQuery {
    pub user_email: Option<String>,
    /// Comma-separated image ids.
    pub ids: Option<String>,
    pub min_size: Option<i64>,
    pub max_size: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Resolved filter. Exactly one group applies per request.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageFilter {
    Ids(Vec<Uuid>),
    SizeBetween { min: i64, max: i64 },
    UploadedBetween { start: DateTime<Utc>, end: DateTime<Utc> },
    Unfiltered,
}

/// Which rows a listing may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryScope {
    Owner(Uuid),
    Global,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    OriginalFileName,
    FileSize,
    ContentType,
    UploadDate,
}

impl SortField {
    /// Maps the public field name onto its column. Closed set: nothing the
    /// caller sends is ever spliced into SQL as an identifier.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::OriginalFileName => "original_file_name",
            SortField::FileSize => "file_size",
            SortField::ContentType => "content_type",
            SortField::UploadDate => "upload_date",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        const NAMES: [(&str, SortField); 6] = [
            ("id", SortField::Id),
            ("name", SortField::Name),
            ("originalFileName", SortField::OriginalFileName),
            ("fileSize", SortField::FileSize),
            ("contentType", SortField::ContentType),
            ("uploadDate", SortField::UploadDate),
        ];
        NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, field)| *field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Case-insensitive `desc`; anything else, including absence, sorts
    /// ascending.
    fn parse(s: Option<&str>) -> Self {
        match s {
            Some(value) if value.eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => " ASC",
            SortOrder::Desc => " DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl ImageQuery {
    /// Resolves the filter with fixed precedence: a non-empty id set wins,
    /// then a complete size range, then a complete date range, then no
    /// filter. Incomplete groups fall through to the next rule.
    pub fn filter(&self) -> Result<ImageFilter, AppError> {
        if let Some(raw) = &self.ids {
            let ids = parse_ids(raw)?;
            if !ids.is_empty() {
                return Ok(ImageFilter::Ids(ids));
            }
        }

        if let (Some(min), Some(max)) = (self.min_size, self.max_size) {
            return Ok(ImageFilter::SizeBetween { min, max });
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            // The end day is included in full: the upper bound is the start
            // of the following day, exclusive.
            let upper = end
                .checked_add_days(Days::new(1))
                .ok_or_else(|| AppError::InvalidInput("endDate is out of range".to_string()))?;
            return Ok(ImageFilter::UploadedBetween {
                start: start.and_time(NaiveTime::MIN).and_utc(),
                end: upper.and_time(NaiveTime::MIN).and_utc(),
            });
        }

        Ok(ImageFilter::Unfiltered)
    }

    pub fn sort(&self) -> Result<ImageSort, AppError> {
        let field = match self.sort_by.as_deref() {
            None => SortField::UploadDate,
            Some(name) => SortField::parse(name).ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "Unknown sortBy field: {name}. Allowed: id, name, originalFileName, fileSize, contentType, uploadDate"
                ))
            })?,
        };
        let order = SortOrder::parse(self.sort_order.as_deref());
        Ok(ImageSort { field, order })
    }
}

fn parse_ids(raw: &str) -> Result<Vec<Uuid>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            Uuid::parse_str(part)
                .map_err(|_| AppError::InvalidInput(format!("Invalid image id: {part}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> ImageQuery {
        ImageQuery::default()
    }

    #[test]
    fn defaults_to_unfiltered() {
        assert_eq!(query().filter().unwrap(), ImageFilter::Unfiltered);
    }

    #[test]
    fn ids_take_precedence_over_everything() {
        let id = Uuid::new_v4();
        let q = ImageQuery {
            ids: Some(id.to_string()),
            min_size: Some(1),
            max_size: Some(100),
            start_date: Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            end_date: Some(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()),
            ..query()
        };
        assert_eq!(q.filter().unwrap(), ImageFilter::Ids(vec![id]));
    }

    #[test]
    fn size_range_beats_date_range() {
        let q = ImageQuery {
            min_size: Some(10),
            max_size: Some(20),
            start_date: Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            end_date: Some(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()),
            ..query()
        };
        assert_eq!(q.filter().unwrap(), ImageFilter::SizeBetween { min: 10, max: 20 });
    }

    #[test]
    fn partial_size_range_falls_through_to_dates() {
        let q = ImageQuery {
            min_size: Some(10),
            start_date: Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            end_date: Some(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()),
            ..query()
        };
        assert!(matches!(q.filter().unwrap(), ImageFilter::UploadedBetween { .. }));
    }

    #[test]
    fn partial_date_range_is_ignored() {
        let q = ImageQuery {
            end_date: Some(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()),
            ..query()
        };
        assert_eq!(q.filter().unwrap(), ImageFilter::Unfiltered);
    }

    #[test]
    fn empty_ids_parameter_counts_as_absent() {
        let q = ImageQuery {
            ids: Some(" , ,".to_string()),
            min_size: Some(1),
            max_size: Some(2),
            ..query()
        };
        assert_eq!(q.filter().unwrap(), ImageFilter::SizeBetween { min: 1, max: 2 });
    }

    #[test]
    fn malformed_id_is_a_caller_fault() {
        let q = ImageQuery {
            ids: Some("not-a-uuid".to_string()),
            ..query()
        };
        assert!(matches!(q.filter(), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn ids_tolerate_whitespace() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let q = ImageQuery {
            ids: Some(format!(" {a} , {b} ")),
            ..query()
        };
        assert_eq!(q.filter().unwrap(), ImageFilter::Ids(vec![a, b]));
    }

    #[test]
    fn date_range_covers_the_full_end_day() {
        let q = ImageQuery {
            start_date: Some(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()),
            end_date: Some(NaiveDate::from_ymd_opt(2024, 3, 12).unwrap()),
            ..query()
        };
        let ImageFilter::UploadedBetween { start, end } = q.filter().unwrap() else {
            panic!("expected a date filter");
        };
        assert_eq!(start.to_rfc3339(), "2024-03-10T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-03-13T00:00:00+00:00");
    }

    #[test]
    fn sort_defaults_to_upload_date_ascending() {
        let sort = query().sort().unwrap();
        assert_eq!(sort.field, SortField::UploadDate);
        assert_eq!(sort.order, SortOrder::Asc);
    }

    #[test]
    fn sort_field_names_are_case_insensitive() {
        let q = ImageQuery {
            sort_by: Some("FILESIZE".to_string()),
            ..query()
        };
        assert_eq!(q.sort().unwrap().field, SortField::FileSize);
    }

    #[test]
    fn unknown_sort_field_is_rejected() {
        let q = ImageQuery {
            sort_by: Some("password".to_string()),
            ..query()
        };
        assert!(matches!(q.sort(), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn sort_order_falls_back_to_ascending() {
        for raw in ["desc", "DESC", "DeSc"] {
            let q = ImageQuery {
                sort_order: Some(raw.to_string()),
                ..query()
            };
            assert_eq!(q.sort().unwrap().order, SortOrder::Desc);
        }
        let q = ImageQuery {
            sort_order: Some("sideways".to_string()),
            ..query()
        };
        assert_eq!(q.sort().unwrap().order, SortOrder::Asc);
    }

    #[test]
    fn every_sort_field_maps_to_a_column() {
        let cases = [
            ("id", "id"),
            ("name", "name"),
            ("originalFileName", "original_file_name"),
            ("fileSize", "file_size"),
            ("contentType", "content_type"),
            ("uploadDate", "upload_date"),
        ];
        for (name, column) in cases {
            assert_eq!(SortField::parse(name).unwrap().column(), column);
        }
    }
}
