fn main() {
    bootcode_build::emit_target_cfgs();
}
