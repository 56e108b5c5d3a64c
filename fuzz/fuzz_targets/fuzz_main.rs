// SPDX-License-Identifier: AGPL-3.0-or-later
#![no_main]

use libfuzzer_sys::fuzz_target;
use markstyle_core::{convert, parser_for, ConvertConfig, Format, LineParser};

fuzz_target!(|data: &str| {
    for format in Format::ALL {
        for line in data.split('\n') {
            let result = parser_for(format).parse_line(line);
            let len = result.char_len();
            assert!(result.spans.iter().all(|span| span.fits(len)));
        }
    }

    let conversion = convert(data, &ConvertConfig::default());
    let len = conversion.text.chars().count();
    assert!(conversion.ranges.iter().all(|r| r.start <= r.end && r.end < len));
});
