use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Application profile, with a translation regime.
    A,
    /// Real-time profile, fixed vector base, no translation.
    R,
    /// Microcontroller profile, memory-mapped system registers.
    M,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Isa {
    A64,
    A32,
    T32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetProfile {
    pub profile: Profile,
    pub isa: Isa,
    /// Major architecture version.
    pub arch: u32,
}

impl Profile {
    pub fn as_cfg(&self) -> &'static str {
        match self {
            Profile::A => "a",
            Profile::R => "r",
            Profile::M => "m",
        }
    }
}

impl Isa {
    pub fn as_cfg(&self) -> &'static str {
        match self {
            Isa::A64 => "a64",
            Isa::A32 => "a32",
            Isa::T32 => "t32",
        }
    }
}

impl TargetProfile {
    const fn new(profile: Profile, isa: Isa, arch: u32) -> Self {
        Self { profile, isa, arch }
    }

    /// `target_features` is the comma-separated `CARGO_CFG_TARGET_FEATURE` value.
    pub fn strict_align(&self, target_features: &str) -> bool {
        // v6-M has no unaligned access support at all.
        if self.profile == Profile::M && self.arch == 6 {
            return true;
        }
        target_features.split(',').any(|f| f == "strict-align")
    }

    pub fn cfgs(&self, target_features: &str) -> Vec<String> {
        let mut cfgs = vec![
            format!(r#"arm_profile="{}""#, self.profile.as_cfg()),
            format!(r#"arm_isa="{}""#, self.isa.as_cfg()),
            format!(r#"arm_arch="{}""#, self.arch),
        ];
        if self.strict_align(target_features) {
            cfgs.push("arm_strict_align".to_string());
        }
        cfgs
    }
}

impl fmt::Display for TargetProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-profile v{} ({})",
            self.profile.as_cfg().to_uppercase(),
            self.arch,
            self.isa.as_cfg()
        )
    }
}

/// Map a target triple to its profile, or `None` for non-Arm and pre-v6 triples.
pub fn classify(triple: &str) -> Option<TargetProfile> {
    use Isa::*;
    use Profile::*;

    let arch = triple.split('-').next()?;
    let tp = match arch {
        "aarch64" | "aarch64_be" => TargetProfile::new(A, A64, 8),
        a if a.starts_with("thumbv6m") => TargetProfile::new(M, T32, 6),
        a if a.starts_with("thumbv7m") || a.starts_with("thumbv7em") => {
            TargetProfile::new(M, T32, 7)
        }
        a if a.starts_with("thumbv8m") || a.starts_with("thumbv8.1m") => {
            TargetProfile::new(M, T32, 8)
        }
        a if a.starts_with("armv7r") || a.starts_with("armebv7r") => TargetProfile::new(R, A32, 7),
        a if a.starts_with("armv8r") => TargetProfile::new(R, A32, 8),
        a if a.starts_with("armv7a") || a == "armv7" || a.starts_with("thumbv7neon") => {
            TargetProfile::new(A, A32, 7)
        }
        a if a.starts_with("armv8a") => TargetProfile::new(A, A32, 8),
        _ => return None,
    };
    Some(tp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aarch64_is_a_profile_a64() {
        let tp = classify("aarch64-unknown-none").unwrap();
        assert_eq!(tp, TargetProfile::new(Profile::A, Isa::A64, 8));
        assert_eq!(
            classify("aarch64-unknown-none-softfloat").unwrap().isa,
            Isa::A64
        );
    }

    #[test]
    fn test_m_profile_versions() {
        assert_eq!(classify("thumbv6m-none-eabi").unwrap().arch, 6);
        assert_eq!(classify("thumbv7em-none-eabihf").unwrap().arch, 7);
        assert_eq!(classify("thumbv8m.main-none-eabihf").unwrap().arch, 8);
        assert_eq!(classify("thumbv8m.base-none-eabi").unwrap().arch, 8);
        assert_eq!(
            classify("thumbv8.1m.main-none-eabi").unwrap().profile,
            Profile::M
        );
    }

    #[test]
    fn test_aarch32_a_and_r() {
        let a = classify("armv7a-none-eabi").unwrap();
        assert_eq!((a.profile, a.isa, a.arch), (Profile::A, Isa::A32, 7));

        let r = classify("armv8r-none-eabihf").unwrap();
        assert_eq!((r.profile, r.arch), (Profile::R, 8));
        assert_eq!(classify("armebv7r-none-eabi").unwrap().profile, Profile::R);
    }

    #[test]
    fn test_host_and_old_arm_are_unclassified() {
        assert!(classify("x86_64-unknown-linux-gnu").is_none());
        assert!(classify("armv5te-unknown-linux-gnueabi").is_none());
        assert!(classify("riscv64gc-unknown-none-elf").is_none());
        assert!(classify("").is_none());
    }

    #[test]
    fn test_strict_align_from_profile_or_feature() {
        let v6m = classify("thumbv6m-none-eabi").unwrap();
        assert!(v6m.strict_align(""));
        assert!(v6m.cfgs("").contains(&"arm_strict_align".to_string()));

        let a64 = classify("aarch64-unknown-none").unwrap();
        assert!(!a64.strict_align("neon,fp-armv8"));
        assert!(a64.strict_align("neon,strict-align"));
    }

    #[test]
    fn test_cfg_strings() {
        let tp = classify("armv7r-none-eabihf").unwrap();
        assert_eq!(
            tp.cfgs(""),
            vec![
                r#"arm_profile="r""#.to_string(),
                r#"arm_isa="a32""#.to_string(),
                r#"arm_arch="7""#.to_string(),
            ]
        );
        assert_eq!(tp.to_string(), "R-profile v7 (a32)");
    }
}
