//! 표 형태 화면에 저장소 항목을 묶기 위한 열 정의.

use std::collections::HashMap;

/// 열 정의 생성 시 발생 가능한 오류.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// 같은 이름의 열이 두 번 이상 나옴
    DuplicateHeader(String),
    /// 열 속성 배열 길이가 헤더 수와 다름
    LengthMismatch { headers: usize, found: usize },
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::DuplicateHeader(h) => write!(f, "중복된 열 이름: {h}"),
            GridError::LengthMismatch { headers, found } => {
                write!(f, "열 속성 개수 불일치: 헤더 {headers}개, 속성 {found}개")
            }
        }
    }
}

impl std::error::Error for GridError {}

/// 열 이름과 위치를 양방향으로 대응시키는 불변 열 정의.
#[derive(Debug, Clone, PartialEq)]
pub struct GridColumnTemplate {
    headers: Vec<String>,
    column_format_strings: Vec<String>,
    read_only_columns: Vec<bool>,
    index_by_name: HashMap<String, usize>,
    name_by_index: HashMap<usize, String>,
}

impl GridColumnTemplate {
    /// 모든 열이 "G" 형식, 편집 가능인 정의를 만든다.
    pub fn new(headers: &[&str]) -> Result<Self, GridError> {
        let formats = vec!["G"; headers.len()];
        let read_only = vec![false; headers.len()];
        Self::with_columns(headers, &formats, &read_only)
    }

    pub fn with_columns(
        headers: &[&str],
        column_format_strings: &[&str],
        read_only_columns: &[bool],
    ) -> Result<Self, GridError> {
        for found in [column_format_strings.len(), read_only_columns.len()] {
            if found != headers.len() {
                return Err(GridError::LengthMismatch {
                    headers: headers.len(),
                    found,
                });
            }
        }
        let mut index_by_name = HashMap::with_capacity(headers.len());
        let mut name_by_index = HashMap::with_capacity(headers.len());
        for (index, header) in headers.iter().enumerate() {
            if index_by_name.insert(header.to_string(), index).is_some() {
                return Err(GridError::DuplicateHeader(header.to_string()));
            }
            name_by_index.insert(index, header.to_string());
        }
        Ok(Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            column_format_strings: column_format_strings.iter().map(|s| s.to_string()).collect(),
            read_only_columns: read_only_columns.to_vec(),
            index_by_name,
            name_by_index,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index_by_name.get(name).copied()
    }

    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.name_by_index.get(&index).map(String::as_str)
    }

    pub fn format_string(&self, index: usize) -> Option<&str> {
        self.column_format_strings.get(index).map(String::as_str)
    }

    pub fn is_read_only(&self, index: usize) -> bool {
        self.read_only_columns.get(index).copied().unwrap_or(false)
    }

    /// 열의 형식 문자열로 숫자를 문자열로 만든다.
    ///
    /// 지원 형식: `G`(일반), `Fn`(소수점 n자리), `En`(지수, 가수 n자리), `Nn`(천 단위 구분).
    pub fn format_cell(&self, index: usize, value: f64) -> String {
        format_number(self.format_string(index).unwrap_or("G"), value)
    }
}

fn format_number(format: &str, value: f64) -> String {
    let (kind, digits) = format.split_at(format.len().min(1));
    let precision = digits.parse::<usize>().ok();
    match (kind.to_ascii_uppercase().as_str(), precision) {
        ("F", p) => format!("{:.*}", p.unwrap_or(2), value),
        ("E", p) => format!("{:.*e}", p.unwrap_or(6), value),
        ("N", p) => group_thousands(&format!("{:.*}", p.unwrap_or(2), value)),
        _ => format!("{value}"),
    }
}

fn group_thousands(text: &str) -> String {
    let (sign, rest) = match text.strip_prefix('-') {
        Some(r) => ("-", r),
        None => ("", text),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
