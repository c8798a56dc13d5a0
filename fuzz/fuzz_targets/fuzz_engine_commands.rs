#![no_main]

use libfuzzer_sys::fuzz_target;
use pomotick::phase::{Durations, LONG_BREAK_EVERY, PhaseEngine, PhaseKind};

fuzz_target!(|data: &[u8]| {
    let Some((head, ops)) = data.split_first_chunk::<3>() else {
        return;
    };
    let Ok(durations) = Durations::new(
        u64::from(head[0]),
        u64::from(head[1]),
        u64::from(head[2]),
    ) else {
        return;
    };
    let mut engine = PhaseEngine::new(durations);

    for chunk in ops.chunks(4) {
        match chunk[0] % 7 {
            0 => engine.start(),
            1 => engine.pause(),
            2 => engine.reset_phase(),
            3 => engine.reset_cycle(),
            4 => {
                engine.skip();
            }
            5 => {
                engine.tick();
            }
            _ => {
                let arg = |i: usize| chunk.get(i).copied().map_or(0, u64::from);
                let _ = engine.reconfigure(arg(1), arg(2), arg(3));
            }
        }

        let snap = engine.snapshot();
        assert!(snap.remaining_seconds <= engine.durations().for_phase(snap.mode));
        assert!(!snap.running || snap.remaining_seconds > 0);
        if snap.mode == PhaseKind::LongBreak {
            assert_eq!(snap.completed_work_phases % LONG_BREAK_EVERY, 0);
        }
    }
});
