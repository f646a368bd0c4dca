use super::error::ValidationError;

/// Blood pressure severity bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BloodPressureTier {
    Normal,
    Elevated,
    Stage1,
    Stage2,
}

impl BloodPressureTier {
    /// Classify a reading using the literal bracket table.
    ///
    /// Brackets require both readings to agree. Mixed readings that fit no
    /// named bracket (e.g. 135/70) land in `Stage2`.
    pub fn classify(systolic: i64, diastolic: i64) -> Self {
        match (systolic, diastolic) {
            (s, d) if s <= 120 && d <= 80 => BloodPressureTier::Normal,
            (120..=129, d) if d < 80 => BloodPressureTier::Elevated,
            (130..=139, 80..=89) => BloodPressureTier::Stage1,
            (140.., 90..) => BloodPressureTier::Stage2,
            _ => BloodPressureTier::Stage2,
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            BloodPressureTier::Normal => 0,
            BloodPressureTier::Elevated => 1,
            BloodPressureTier::Stage1 => 2,
            BloodPressureTier::Stage2 => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BloodPressureTier::Normal => "Normal",
            BloodPressureTier::Elevated => "Elevated",
            BloodPressureTier::Stage1 => "Stage 1",
            BloodPressureTier::Stage2 => "Stage 2",
        }
    }
}

/// A parsed "systolic/diastolic" reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloodPressure {
    pub systolic: i64,
    pub diastolic: i64,
}

impl BloodPressure {
    /// Parse a "systolic/diastolic" string.
    ///
    /// Each side is read as a leading integer, so "120.5/80mm" is 120/80.
    /// Anything after a second `/` is ignored.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::IsInvalid);
        }

        let mut parts = s.split('/');
        let systolic = parts.next().and_then(parse_leading_int);
        let diastolic = parts.next().and_then(parse_leading_int);

        let systolic = systolic.ok_or(ValidationError::MissingSystolic)?;
        let diastolic = diastolic.ok_or(ValidationError::MissingDiastolic)?;

        Ok(BloodPressure {
            systolic,
            diastolic,
        })
    }

    pub fn tier(&self) -> BloodPressureTier {
        BloodPressureTier::classify(self.systolic, self.diastolic)
    }
}

/// Read an optionally signed integer prefix, skipping leading whitespace.
/// A `0x`/`0X` prefix switches to hexadecimal. Returns None when no digits
/// follow; values past the i64 range saturate.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let (radix, digits) = match rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))
    {
        Some(hex) => (16, hex),
        None => (10, rest),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for digit in digits.chars().map_while(|c| c.to_digit(radix)) {
        seen_digit = true;
        value = value
            .checked_mul(i64::from(radix))
            .and_then(|v| v.checked_add(i64::from(digit)))
            .unwrap_or(i64::MAX);
    }

    if !seen_digit {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Temperature points (degrees Fahrenheit).
///
/// Values between the literal bounds (e.g. 99.55, 100.95) match no bracket
/// and score 0.
pub fn temperature_points(temperature: f64) -> u32 {
    if temperature <= 99.5 {
        0
    } else if (99.6..=100.9).contains(&temperature) {
        1
    } else if temperature >= 101.0 {
        2
    } else {
        0
    }
}

/// Age points (years).
pub fn age_points(age: f64) -> u32 {
    if age < 40.0 {
        0
    } else if age <= 65.0 {
        1
    } else {
        2
    }
}
