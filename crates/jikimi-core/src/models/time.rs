//! 시간 분해 및 카운트다운 표시 단위.

use serde::{Deserialize, Serialize};

/// 초를 시/분/초로 분해한 값
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeParts {
    /// 시 단위
    pub hours: u64,
    /// 분 단위 (0..60)
    pub minutes: u64,
    /// 초 단위 (0..60)
    pub seconds: u64,
}

impl TimeParts {
    /// 전체 초를 시/분/초로 분해
    pub fn from_secs(secs: u64) -> Self {
        let hours = secs / 3600;
        let rem = secs % 3600;
        Self {
            hours,
            minutes: rem / 60,
            seconds: rem % 60,
        }
    }
}

/// 카운트다운 표시 단위
///
/// 남은 시간이 60초를 넘고 정확히 분 경계이면 분으로,
/// 그 외에는 초 단위 그대로 표시한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownDisplay {
    /// 분 단위 표시
    Minutes(u64),
    /// 초 단위 표시
    Seconds(u64),
}

impl CountdownDisplay {
    /// 매 틱마다 남은 초에 대한 표시 단위 결정
    pub fn for_remaining(secs: u64) -> Self {
        if secs > 60 && secs % 60 == 0 {
            CountdownDisplay::Minutes(secs / 60)
        } else {
            CountdownDisplay::Seconds(secs)
        }
    }

    /// 다이얼로그 최초 표시용 단위 (분 우선, 내림)
    pub fn initial(countdown_secs: u64) -> Self {
        if countdown_secs > 60 {
            CountdownDisplay::Minutes(countdown_secs / 60)
        } else {
            CountdownDisplay::Seconds(countdown_secs)
        }
    }

    /// 표시 수치
    pub fn value(&self) -> u64 {
        match self {
            CountdownDisplay::Minutes(v) | CountdownDisplay::Seconds(v) => *v,
        }
    }

    /// 단위 라벨
    pub fn unit_label(&self) -> &'static str {
        match self {
            CountdownDisplay::Minutes(_) => "분",
            CountdownDisplay::Seconds(_) => "초",
        }
    }
}

impl std::fmt::Display for CountdownDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.value(), self.unit_label())
    }
}
