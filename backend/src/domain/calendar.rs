//! Month arithmetic for the domain services.
//!
//! Months are 0-based (0 = January) to match how bills are keyed across the
//! public API.

/// Navigate to the previous month, rolling the year back from January
pub fn previous_month(month: u32, year: i32) -> (u32, i32) {
    if month == 0 {
        (11, year - 1)
    } else {
        (month - 1, year)
    }
}

/// Navigate to the next month, rolling the year forward from December
pub fn next_month(month: u32, year: i32) -> (u32, i32) {
    if month == 11 {
        (0, year + 1)
    } else {
        (month + 1, year)
    }
}

/// Get the number of days in a given month (0-based) and year
pub fn days_in_month(month: u32, year: i32) -> u32 {
    match month {
        1 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        3 | 5 | 8 | 10 => 30,
        _ => 31,
    }
}

/// Check if a year is a leap year
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Get the human-readable name for a 0-based month number
pub fn month_name(month: u32) -> &'static str {
    match month {
        0 => "January",
        1 => "February",
        2 => "March",
        3 => "April",
        4 => "May",
        5 => "June",
        6 => "July",
        7 => "August",
        8 => "September",
        9 => "October",
        10 => "November",
        11 => "December",
        _ => "Invalid Month",
    }
}
