#![no_main]

use libfuzzer_sys::fuzz_target;
use swipesheet_core::config::SheetConfig;
use swipesheet_core::coordinator::HostSwipeLock;
use swipesheet_core::host::HostCapabilities;
use swipesheet_core::position::SheetPosition;
use swipesheet_core::sheet::SheetProps;
use swipesheet_web::{PlatformProbe, SheetTouchAdapter, parse_touch_json};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Parser must never panic on arbitrary input.
    let _ = parse_touch_json(text);

    // Newline-separated events through a live adapter.
    let lock = HostSwipeLock::new();
    let mut adapter = SheetTouchAdapter::with_lock(
        SheetProps::new(SheetPosition::Expanded),
        SheetConfig::default(),
        PlatformProbe::default(),
        lock.clone(),
    );
    adapter.announce_capabilities(HostCapabilities::all());
    for line in text.lines() {
        if let Ok(dispatch) = adapter.handle_json(line)
            && !adapter.sheet().is_tracking()
        {
            assert!(!lock.is_disabled(), "lock held with no session: {:?}", dispatch.log);
        }
    }
    adapter.teardown();
    assert!(!lock.is_disabled(), "lock held after teardown");
});
