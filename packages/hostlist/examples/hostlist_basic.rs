//! Example that expands a host-list expression and compresses it back.

fn main() {
    let hosts = hostlist::HostList::parse("n[000-003],g[10-12],login").unwrap();

    for host in hosts.iter() {
        println!("{host}");
    }

    println!("As host list: {hosts}");
}
