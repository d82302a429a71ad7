use net_disk::shell::start_shell;

fn main() {
    start_shell();
}
