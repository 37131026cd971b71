//! Static usage examples.

/// Usage examples printed by `confs examples`.
pub const EXAMPLES: &str = "\
# Put your vim configuration under management.
# Create the group 'vim'; with no variant given, 'vim/default' is created
# and enabled.
$ confs create vim

# Move ~/.vim and ~/.vimrc into vim/default. Each one is replaced by a
# symlink into the store, so it keeps working as before.
$ confs migrate vim/default ~/.vim ~/.vimrc
$ ls -l ~/.vimrc
~/.vimrc -> ~/.confs/vim/default/.vimrc

# Add a second variant and give it its own .vimrc.
$ confs create vim/work
$ confs add vim/work .vimrc ~/.vimrc --is-file

# Switch: uninstall vim/default, enable vim/work and install its targets.
$ confs install vim/work

# See what is managed and what is installed.
$ confs show
$ confs show vim/work";

/// Print the usage examples.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("{EXAMPLES}");
}
