//! Translation table contents.
//!
//! Two shapes are built: a v7 short-descriptor table of 1 MiB sections that
//! maps all 4 GiB flat, and an AArch64 level-1 table that maps only the 1 GiB
//! block holding the image and the one holding the stack/heap.

/// Short-descriptor section: TEX=0b111, AP=0b11, C=B=1, domain 0, global,
/// executable.
pub const SECTION_ATTRS: u32 = 0x7c0e;
pub const SECTION_ENTRIES: usize = 4096;

#[repr(C, align(16384))]
pub struct SectionTable(pub [u32; SECTION_ENTRIES]);

impl SectionTable {
    pub const fn new() -> Self {
        Self([0; SECTION_ENTRIES])
    }

    /// Map every 1 MiB section to itself as normal, cacheable, full access.
    pub fn fill_flat(&mut self) {
        for (index, entry) in self.0.iter_mut().enumerate() {
            *entry = section_entry(index);
        }
    }
}

impl Default for SectionTable {
    fn default() -> Self {
        Self::new()
    }
}

pub const fn section_entry(index: usize) -> u32 {
    SECTION_ATTRS | ((index as u32) << 20)
}

/// Attr0 normal non-cacheable, Attr1 normal write-back, Attr2 device-nGnRnE,
/// Attr3 normal write-back tagged.
pub const MAIR_VALUE: u64 = 0x0000_0000_F000_FF44;

/// TTBR0 walks only, 4 KiB granule, T0SZ=25 (38-bit VA, walk starts at
/// level 1), inner shareable, write-back walks.
pub const TCR_VALUE: u64 = 0x8081_3519;
pub const TCR_TBI: u64 = 1 << 20;
pub const TCR_MTX: u64 = 1 << 33;

pub const BLOCK_ENTRIES: usize = 512;
pub const BLOCK_SHIFT: u32 = 30;

/// Block, AttrIndx=1, AF.
pub const BLOCK_NORMAL: u64 = 0x405;
/// Block, AttrIndx=3, AF.
pub const BLOCK_TAGGED: u64 = 0x40d;
pub const BLOCK_GP: u64 = 1 << 50;
pub const BLOCK_PXN: u64 = 1 << 53;
pub const BLOCK_UXN: u64 = 1 << 54;

#[repr(C, align(4096))]
pub struct BlockTable(pub [u64; BLOCK_ENTRIES]);

impl BlockTable {
    pub const fn new() -> Self {
        Self([0; BLOCK_ENTRIES])
    }

    /// Fault every entry, then map the image block and the stack/heap block.
    ///
    /// # Panics
    /// If either address lies at or above 512 GiB, outside the 39-bit
    /// address space that `TCR_VALUE` configures.
    #[track_caller]
    pub fn fill(&mut self, image_addr: usize, stackheap_addr: usize, opts: BlockOptions) {
        let image = image_addr >> BLOCK_SHIFT;
        let stackheap = stackheap_addr >> BLOCK_SHIFT;
        let checks = [
            ("image", image_addr, image),
            ("stack/heap", stackheap_addr, stackheap),
        ];
        for (what, addr, page) in checks {
            assert!(
                page < BLOCK_ENTRIES,
                "{what} at {addr:#x} is beyond the 512 GiB identity map"
            );
        }

        self.0.fill(0);
        for (page, entry) in block_entries(image, stackheap, opts) {
            self.0[page] = entry;
        }
    }
}

impl Default for BlockTable {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockOptions {
    /// Memory tagging is compiled in.
    pub tagging: bool,
    /// Branch target identification is compiled in.
    pub guarded: bool,
}

/// `(index, descriptor)` for the image block and, when it differs, the
/// stack/heap block.
pub fn block_entries(
    image_page: usize,
    stackheap_page: usize,
    opts: BlockOptions,
) -> impl Iterator<Item = (usize, u64)> {
    let shared = image_page == stackheap_page;

    // A shared block has to be tagged for the stack/heap to be.
    let mut image = if opts.tagging && shared {
        BLOCK_TAGGED
    } else {
        BLOCK_NORMAL
    };
    if opts.guarded {
        image |= BLOCK_GP;
    }
    let image = (image_page, image | ((image_page as u64) << BLOCK_SHIFT));

    let data = (if opts.tagging { BLOCK_TAGGED } else { BLOCK_NORMAL }) | BLOCK_UXN | BLOCK_PXN;
    let stackheap = (!shared).then(|| (stackheap_page, data | ((stackheap_page as u64) << BLOCK_SHIFT)));

    core::iter::once(image).chain(stackheap)
}

/// TCR value. With tagging, MTE4 (`ID_AA64PFR1_EL1[55:52] != 0`) enables
/// canonical tag checking through MTX; older MTE needs top-byte-ignore.
pub const fn tcr_value(tagging: bool, mte4: bool) -> u64 {
    match (tagging, mte4) {
        (false, _) => TCR_VALUE,
        (true, true) => TCR_VALUE | TCR_MTX,
        (true, false) => TCR_VALUE | TCR_TBI,
    }
}
