use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};

use bootcode::{run, ImageLayout, Profile, Runtime};

thread_local! {
    static LOG: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    static IMAGE: RefCell<Option<(Vec<u8>, Vec<u8>)>> = const { RefCell::new(None) };
}

fn log(entry: impl Into<String>) {
    LOG.with(|l| l.borrow_mut().push(entry.into()));
}

fn take_log() -> Vec<String> {
    LOG.with(|l| l.take())
}

/// Fails the boot if any step runs before relocation is visible.
struct Checked;

impl Profile for Checked {
    fn setup_exceptions() {
        log("exceptions");
    }

    fn setup_memory() {
        log("memory");
    }

    fn setup_misc() {
        log("misc");
    }

    fn enable_cache() {
        let relocated = IMAGE.with(|i| {
            i.borrow()
                .as_ref()
                .map(|(data, bss)| data == b"hello" && bss.iter().all(|&b| b == 0))
        });
        log(format!("cache relocated={relocated:?}"));
    }
}

struct Application<const STATUS: i32>;

impl<const STATUS: i32> Runtime for Application<STATUS> {
    fn init_array() {
        log("init_array");
    }

    fn platform_init() {
        log("platform_init");
    }

    fn main(argc: i32, argv: *const *const u8) -> i32 {
        log(format!("main argc={argc} argv_null={}", argv.is_null()));
        STATUS
    }

    fn exit(status: i32) -> ! {
        log(format!("exit {status}"));
        panic::panic_any(status)
    }
}

fn boot<R: Runtime>(layout: &ImageLayout) -> i32 {
    let err = panic::catch_unwind(AssertUnwindSafe(|| run::<Checked, R>(layout)))
        .expect_err("run returned");
    *err.downcast::<i32>().expect("exit status")
}

#[test]
fn test_zero_sized_image_boots_to_exit() {
    let status = boot::<Application<0>>(&ImageLayout::EMPTY);
    assert_eq!(status, 0);
    assert_eq!(
        take_log(),
        [
            "exceptions",
            "memory",
            "misc",
            "cache relocated=None",
            "init_array",
            "platform_init",
            "main argc=0 argv_null=true",
            "exit 0",
        ]
    );
}

#[test]
fn test_relocation_lands_before_cache_enable() {
    let source = b"hello".to_vec();
    IMAGE.with(|i| *i.borrow_mut() = Some((vec![0; 5], vec![0xaa; 32])));

    let layout = IMAGE.with(|i| {
        let mut image = i.borrow_mut();
        let (data, bss) = image.as_mut().unwrap();
        ImageLayout {
            data_source: source.as_ptr(),
            data_start: data.as_mut_ptr(),
            data_size: data.len(),
            bss_start: bss.as_mut_ptr(),
            bss_size: bss.len(),
        }
    });

    boot::<Application<3>>(&layout);
    let log = take_log();
    assert_eq!(log[3], "cache relocated=Some(true)");
}

#[test]
fn test_exit_receives_main_status_unchanged() {
    assert_eq!(boot::<Application<{ -1 }>>(&ImageLayout::EMPTY), -1);
    assert_eq!(take_log().last().map(String::as_str), Some("exit -1"));

    assert_eq!(boot::<Application<255>>(&ImageLayout::EMPTY), 255);
    take_log();
}
