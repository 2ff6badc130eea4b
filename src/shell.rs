//! a line based command shell on top of a [FileSystem]
//!
//! The shell only parses commands and prints results, every rule about
//! blocks, names and attributes lives in the filesystem itself.
use std::io::{BufRead, Write};

use byte_unit::Byte;
use log::{debug, warn};
use thiserror::Error;

use crate::fs::{FileSystem, FsError, NodeId};
use crate::utils::fs_size_calculator;

const HELP: &str = "\
ls|dir [-a] [path]        list a folder
cd path                   change the current folder
pwd                       print the current folder
md|mkdir path             create a folder
mf|mkfile path            create a file
rm path                   delete a file or folder
cat path [units]          show a node, read units from a file
rename path name          rename a file or folder
echop text path           write len(text) units at the start of a file
append text path          write len(text) units at the end of a file
attrib path [+r|-r|+a|-a|+s|-s|+h|-h]...
                          show or change attributes
blocks path               show the block chain of a file
df                        show free space
quit|exit                 leave the shell";

/// whether the shell should keep reading commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell<R, W> {
    fs: FileSystem,
    input: R,
    output: W,
    prompt: bool,
}

impl<R, W> Shell<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(fs: FileSystem, input: R, output: W) -> Self {
        Shell {
            fs,
            input,
            output,
            prompt: false,
        }
    }

    /// print `$ ` before reading each command
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn filesystem(&self) -> &FileSystem {
        &self.fs
    }

    /// give back the filesystem and the output
    pub fn into_parts(self) -> (FileSystem, W) {
        (self.fs, self.output)
    }

    /// read and execute commands until `quit` or the end of the input
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            if self.prompt {
                write!(self.output, "$ ")?;
                self.output.flush()?;
            }
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            if self.execute(line.trim())? == Flow::Quit {
                break;
            }
        }
        self.output.flush()?;
        Ok(())
    }

    /// execute one command line
    ///
    /// Filesystem errors are printed and don't stop the shell, only
    /// failing to write the output does.
    pub fn execute(&mut self, line: &str) -> anyhow::Result<Flow> {
        let args: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = args.split_first() else {
            return Ok(Flow::Continue);
        };
        debug!("executing {command:?} with {args:?}");
        let result = match command {
            "quit" | "exit" => return Ok(Flow::Quit),
            "help" => writeln!(self.output, "{HELP}").map_err(CommandError::from),
            "ls" | "dir" => self.list(args),
            "cd" => self.change_folder(args),
            "pwd" => self.print_current(),
            "md" | "mkdir" => self.make(args, false),
            "mf" | "mkfile" => self.make(args, true),
            "rm" => self.remove(args),
            "cat" => self.cat(args),
            "rename" => self.rename(args),
            "echop" => self.write_text(args, false),
            "append" => self.write_text(args, true),
            "attrib" => self.attrib(args),
            "blocks" => self.blocks(args),
            "df" => self.disk_free(),
            _ => Err(CommandError::Usage("unknown command, try `help`")),
        };
        match result {
            Ok(()) => {}
            Err(CommandError::Fs(e)) => {
                warn!("{command} failed with status {}: {e}", e.code());
                writeln!(self.output, "{command}: {e}")?;
            }
            Err(CommandError::Usage(usage)) => writeln!(self.output, "{command}: {usage}")?,
            Err(CommandError::Io(e)) => return Err(e.into()),
        }
        Ok(Flow::Continue)
    }
}

/// why a single command failed
#[derive(Error, Debug)]
enum CommandError {
    #[error(transparent)]
    Fs(#[from] FsError),
    #[error("{0}")]
    Usage(&'static str),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

type CommandResult = Result<(), CommandError>;

/// the commands
impl<R, W> Shell<R, W>
where
    R: BufRead,
    W: Write,
{
    fn list(&mut self, args: &[&str]) -> CommandResult {
        let show_hidden = args.first() == Some(&"-a");
        let args = if show_hidden { &args[1..] } else { args };
        let folder = match args.first() {
            Some(path) => self.fs.open_folder(path)?,
            None => self.fs.current(),
        };
        writeln!(self.output, "Folder: {}", self.fs.path_of(folder)?)?;
        writeln!(self.output, ".\n..")?;
        for &child in self.fs.children(folder)? {
            let node = self.fs.node(child)?;
            if node.attributes.hidden && !show_hidden {
                continue;
            }
            let suffix = if node.is_folder() { "/" } else { "" };
            writeln!(self.output, "{}{suffix}", node.name)?;
        }
        Ok(())
    }

    fn change_folder(&mut self, args: &[&str]) -> CommandResult {
        let path = args.first().ok_or(CommandError::Usage("usage: cd path"))?;
        self.fs.change_folder(path)?;
        Ok(())
    }

    fn print_current(&mut self) -> CommandResult {
        writeln!(self.output, "{}", self.fs.path_of(self.fs.current())?)?;
        Ok(())
    }

    fn make(&mut self, args: &[&str], file: bool) -> CommandResult {
        let path = args.first().ok_or(CommandError::Usage("usage: md|mf path"))?;
        if file {
            self.fs.create_file(path)?;
        } else {
            self.fs.create_folder(path)?;
        }
        Ok(())
    }

    fn remove(&mut self, args: &[&str]) -> CommandResult {
        let path = args.first().ok_or(CommandError::Usage("usage: rm path"))?;
        let input = &mut self.input;
        let output = &mut self.output;
        let removed = self.fs.remove(path, |folder| {
            confirm(
                input,
                output,
                &format!("Folder {folder} is not empty, delete it recursively?"),
            )
        })?;
        if !removed {
            writeln!(self.output, "rm: {path} kept")?;
        }
        Ok(())
    }

    fn cat(&mut self, args: &[&str]) -> CommandResult {
        let path = args
            .first()
            .ok_or(CommandError::Usage("usage: cat path [units]"))?;
        let id = self.fs.lookup(path)?;
        let node = self.fs.node(id)?;
        if let Some(children) = node.children() {
            writeln!(
                self.output,
                "Folder {}, created {}, modified {}, entries: {}",
                node.name,
                node.created_at,
                node.modified_at,
                children.len()
            )?;
            return Ok(());
        }
        writeln!(
            self.output,
            "File {}, created {}, modified {}, size: {}",
            node.name,
            node.created_at,
            node.modified_at,
            node.size()
        )?;
        let units = match args.get(1) {
            Some(units) => units
                .parse()
                .map_err(|_| CommandError::Usage("units must be a number"))?,
            None => node.size(),
        };
        self.fs.open_file(path)?;
        let read = self.fs.read_file(id, units);
        self.fs.close_file(id)?;
        writeln!(self.output, "Read {} units", read?)?;
        Ok(())
    }

    fn rename(&mut self, args: &[&str]) -> CommandResult {
        let [path, name] = args else {
            return Err(CommandError::Usage("usage: rename path name"));
        };
        let id = self.fs.lookup(path)?;
        self.fs.rename(id, name)?;
        Ok(())
    }

    fn write_text(&mut self, args: &[&str], append: bool) -> CommandResult {
        let [text, path] = args else {
            return Err(CommandError::Usage("usage: echop|append text path"));
        };
        let id = match self.fs.open_file(path) {
            Ok(id) => id,
            Err(FsError::NotFound) => self.fs.create_file(path)?,
            Err(e) => return Err(e.into()),
        };
        if append {
            let size = self.fs.node(id)?.size();
            self.fs.seek(id, size)?;
        }
        let written = self.fs.write_file(id, text.len() as u64);
        self.fs.close_file(id)?;
        written?;
        Ok(())
    }

    fn attrib(&mut self, args: &[&str]) -> CommandResult {
        let (path, changes) = args.split_first().ok_or(CommandError::Usage(
            "usage: attrib path [+r|-r|+a|-a|+s|-s|+h|-h]...",
        ))?;
        let id = self.fs.lookup(path)?;
        let mut attributes = self.fs.get_attributes(id)?;
        if changes.is_empty() {
            writeln!(self.output, "{attributes} {}", self.fs.path_of(id)?)?;
            return Ok(());
        }
        for change in changes {
            let (set, flag) = if let Some(flag) = change.strip_prefix('+') {
                (true, flag)
            } else if let Some(flag) = change.strip_prefix('-') {
                (false, flag)
            } else {
                return Err(CommandError::Usage("attributes look like +r or -h"));
            };
            match flag.to_ascii_lowercase().as_str() {
                "r" => attributes.readonly = set,
                "a" => attributes.archive = set,
                "s" => attributes.system = set,
                "h" => attributes.hidden = set,
                _ => return Err(CommandError::Usage("attributes are r, a, s and h")),
            }
        }
        self.fs.set_attributes(id, attributes)?;
        Ok(())
    }

    fn blocks(&mut self, args: &[&str]) -> CommandResult {
        let path = args.first().ok_or(CommandError::Usage("usage: blocks path"))?;
        let id: NodeId = self.fs.lookup(path)?;
        let chain = self.fs.chain_of(id)?;
        let chain: Vec<String> = chain.iter().map(ToString::to_string).collect();
        writeln!(self.output, "{}", chain.join(" -> "))?;
        Ok(())
    }

    fn disk_free(&mut self) -> CommandResult {
        let block_size = self.fs.block_size();
        let free = fs_size_calculator::capacity(self.fs.free_blocks() as u64, block_size);
        let total = fs_size_calculator::capacity(self.fs.capacity() as u64, block_size);
        writeln!(
            self.output,
            "{} free of {} ({} of {} blocks)",
            Byte::from_bytes(free as u128).get_appropriate_unit(true),
            Byte::from_bytes(total as u128).get_appropriate_unit(true),
            self.fs.free_blocks(),
            self.fs.capacity()
        )?;
        Ok(())
    }
}

/// ask a yes/no question until the answer is `y` or `n`, the end of the input means no
fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> bool {
    loop {
        if write!(output, "{question} (y/n): ")
            .and_then(|_| output.flush())
            .is_err()
        {
            return false;
        }
        let mut answer = String::new();
        match input.read_line(&mut answer) {
            Ok(0) | Err(_) => return false,
            Ok(_) => match answer.trim() {
                "y" => return true,
                "n" => return false,
                _ => continue,
            },
        }
    }
}
