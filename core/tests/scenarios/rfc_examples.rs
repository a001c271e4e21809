// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Examples from RFC 5545, section 3.8.5.3.

use jiff::civil::{date, datetime};
use jiff::tz::TimeZone;
use recurcal_core::LooseDateTime;

use crate::common::{assert_occurrences, floating, iter};

fn new_york(y: i16, m: i8, d: i8, h: i8) -> LooseDateTime {
    let tz = TimeZone::get("America/New_York").unwrap();
    LooseDateTime::Zoned(datetime(y, m, d, h, 0, 0, 0).to_zoned(tz).unwrap())
}

#[test]
fn every_ten_days() {
    let it = iter("FREQ=DAILY;INTERVAL=10;COUNT=5", floating(date(1997, 9, 2), 9, 0));
    assert_occurrences(
        &it,
        &[
            "19970902T090000",
            "19970912T090000",
            "19970922T090000",
            "19971002T090000",
            "19971012T090000",
        ],
    );
}

#[test]
fn every_other_week_on_tuesday_and_thursday() {
    let it = iter(
        "FREQ=WEEKLY;INTERVAL=2;WKST=SU;BYDAY=TU,TH;COUNT=8",
        floating(date(1997, 9, 2), 9, 0),
    );
    assert_occurrences(
        &it,
        &[
            "19970902T090000",
            "19970904T090000",
            "19970916T090000",
            "19970918T090000",
            "19970930T090000",
            "19971002T090000",
            "19971014T090000",
            "19971016T090000",
        ],
    );
}

#[test]
fn second_to_last_weekday_of_the_month() {
    let it = iter(
        "FREQ=MONTHLY;BYDAY=MO,TU,WE,TH,FR;BYSETPOS=-2;COUNT=7",
        floating(date(1997, 9, 29), 9, 0),
    );
    assert_occurrences(
        &it,
        &[
            "19970929T090000",
            "19971030T090000",
            "19971127T090000",
            "19971230T090000",
            "19980129T090000",
            "19980226T090000",
            "19980330T090000",
        ],
    );
}

#[test]
fn monday_of_week_twenty() {
    let it = iter(
        "FREQ=YEARLY;BYWEEKNO=20;BYDAY=MO;COUNT=3",
        floating(date(1997, 5, 12), 9, 0),
    );
    assert_occurrences(
        &it,
        &["19970512T090000", "19980511T090000", "19990517T090000"],
    );
}

#[test]
fn every_three_hours_in_new_york() {
    let it = iter(
        "FREQ=HOURLY;INTERVAL=3;UNTIL=19970902T210000Z",
        new_york(1997, 9, 2, 9),
    );
    assert_occurrences(
        &it,
        &["19970902T130000Z", "19970902T160000Z", "19970902T190000Z"],
    );
}

#[test]
fn zoned_wall_time_survives_dst() {
    let it = iter("FREQ=WEEKLY;COUNT=3", new_york(2024, 10, 27, 9));
    assert_occurrences(
        &it,
        &["20241027T130000Z", "20241103T140000Z", "20241110T140000Z"],
    );
}
