use argh::FromArgs;
use image::{ImageFormat, RgbImage};
use rle565::{
    container, nav,
    utils::{rgb565_to_rgb888, rgb888_to_rgb565},
    Image,
};
use std::{
    cmp::Ordering,
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use walkdir::WalkDir;

/// RGB565 RLE asset packer.
#[derive(FromArgs)]
struct Cli {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Pack(Pack),
    Encode(Encode),
    Decode(Decode),
    Inspect(Inspect),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli { command } = argh::from_env();

    match command {
        Command::Pack(options) => pack(options),
        Command::Encode(options) => encode(options),
        Command::Decode(options) => decode(options),
        Command::Inspect(options) => inspect(options),
    }
}

#[derive(Debug)]
enum Format {
    Png,
    Bmp,
}

impl FromStr for Format {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        #[rustfmt::skip]
        let Some(format) = s.eq_ignore_ascii_case("png").then_some(Format::Png)
               .or_else(|| s.eq_ignore_ascii_case("bmp").then_some(Format::Bmp))
        else { return Err("invalid string"); };

        Ok(format)
    }
}

/// Packs a directory tree of PNG/BMP images into assets.bin and
/// navigation.bin.
#[derive(FromArgs)]
#[argh(subcommand, name = "pack")]
struct Pack {
    /// the output directory
    #[argh(option, short = 'o', default = "PathBuf::from(\".\")")]
    out: PathBuf,

    /// also write assets.h, a C include with the encoded images
    #[argh(switch)]
    header: bool,

    /// the directory to scan for images
    #[argh(positional)]
    input: PathBuf,
}

fn pack(options: Pack) -> Result<(), Box<dyn std::error::Error>> {
    let Pack {
        out,
        header,
        input,
    } = options;

    let files = collect_images(&input)?;
    if files.is_empty() {
        return Err(format!("no .png or .bmp images found under `{}`", input.display()).into());
    }

    let mut identifiers = Vec::with_capacity(files.len());
    let mut blobs = Vec::with_capacity(files.len());

    for path in &files {
        let image = load_quantized(path)?;
        let blob = rle565::encode(&image)?;

        // round-trip check before anything is written out
        let decoded = rle565::decode(&blob)?;
        if decoded.pixels != image.pixels {
            return Err(format!("round-trip mismatch for `{}`", path.display()).into());
        }

        let id = identifier_for(&input, path);
        println!(
            "{id:<50} {}x{}, {} bytes",
            image.width,
            image.height,
            blob.len()
        );

        identifiers.push(id);
        blobs.push(blob);
    }

    let entries = nav::build(&identifiers)?;

    fs::create_dir_all(&out)?;
    let assets = container::build(&blobs);
    fs::write(out.join("assets.bin"), &assets)?;
    fs::write(out.join("navigation.bin"), nav::to_bytes(&entries))?;
    if header {
        fs::write(out.join("assets.h"), c_header(&identifiers, &blobs))?;
    }

    println!(
        "Packed {} images into `{}` ({} bytes)",
        blobs.len(),
        out.join("assets.bin").display(),
        assets.len()
    );

    Ok(())
}

/// Walks the input tree in packing order: within each directory, image files
/// sorted by name come first, then subdirectories. This keeps same-folder
/// images contiguous and puts an owning image before its folder's members,
/// which the navigation builder requires.
fn collect_images(root: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by(|a, b| {
        match (a.file_type().is_dir(), b.file_type().is_dir()) {
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
            _ => a.file_name().cmp(b.file_name()),
        }
    }) {
        let entry = entry?;
        if entry.file_type().is_file() && is_image(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("png") || ext.eq_ignore_ascii_case("bmp"))
        .unwrap_or(false)
}

/// The slash-separated identifier of an image: its path relative to the
/// input directory, with the extension stripped.
fn identifier_for(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path).with_extension("");
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn load_quantized(path: &Path) -> Result<Image, Box<dyn std::error::Error>> {
    let image = image::io::Reader::open(path)?
        .with_guessed_format()?
        .decode()?;

    let width = image.width();
    let height = image.height();
    let pixels = image
        .into_rgb8()
        .pixels()
        .map(|p| rgb888_to_rgb565(p.0))
        .collect::<Vec<_>>();

    Ok(Image::new(width, height, pixels))
}

/// Encodes a single image to a standalone RLE blob.
#[derive(FromArgs)]
#[argh(subcommand, name = "encode")]
struct Encode {
    /// the input image (PNG or BMP)
    #[argh(positional)]
    input: PathBuf,
    /// the output file
    #[argh(positional)]
    output: PathBuf,
}

fn encode(options: Encode) -> Result<(), Box<dyn std::error::Error>> {
    let Encode { input, output } = options;

    let image = load_quantized(&input)?;
    println!("Encoding {}x{} image", image.width, image.height);

    let blob = rle565::encode(&image)?;
    fs::write(&output, &blob)?;
    println!("Written {} bytes to `{}`", blob.len(), output.display());

    Ok(())
}

/// Decodes an RLE blob back into an image.
#[derive(FromArgs)]
#[argh(subcommand, name = "decode")]
struct Decode {
    /// output format (png, bmp)
    #[argh(option)]
    format: Format,

    /// the input RLE blob
    #[argh(positional)]
    input: PathBuf,
    /// the output file
    #[argh(positional)]
    output: PathBuf,
}

fn decode(options: Decode) -> Result<(), Box<dyn std::error::Error>> {
    let Decode {
        format,
        input,
        output,
    } = options;

    let data = fs::read(&input)?;
    println!("Decoding `{}`", input.display());

    let image = rle565::decode(&data)?;

    let mut rgb888_raw = Vec::with_capacity(image.pixels.len() * 3);
    for pixel in image.pixels.iter().map(|&p| rgb565_to_rgb888(p)) {
        rgb888_raw.extend_from_slice(&pixel);
    }

    RgbImage::from_vec(image.width, image.height, rgb888_raw)
        .ok_or("failed to create image")?
        .save_with_format(
            &output,
            match format {
                Format::Png => ImageFormat::Png,
                Format::Bmp => ImageFormat::Bmp,
            },
        )?;

    println!(
        "Written {}x{} image to `{}`",
        image.width,
        image.height,
        output.display()
    );

    Ok(())
}

/// Lists the contents of an assets.bin container and verifies that every
/// image in it decodes.
#[derive(FromArgs)]
#[argh(subcommand, name = "inspect")]
struct Inspect {
    /// the container file
    #[argh(positional)]
    input: PathBuf,
}

fn inspect(options: Inspect) -> Result<(), Box<dyn std::error::Error>> {
    let Inspect { input } = options;

    let data = fs::read(&input)?;
    let parsed = container::Container::parse(&data)?;

    for (index, entry) in parsed.entries().iter().enumerate() {
        let asset = parsed.asset(index).unwrap();
        let image = rle565::decode(asset)?;
        println!(
            "{index:4}  offset {:8}  length {:8}  {}x{}",
            entry.offset, entry.length, image.width, image.height
        );
    }

    println!(
        "total entries: {}, file size: {} bytes",
        parsed.len(),
        data.len()
    );

    Ok(())
}

/// Renders the images as a C include in the original on-device layout: one
/// `data_<name>[]` array per image plus an `assets[]` pointer table.
fn c_header(identifiers: &[String], blobs: &[Vec<u8>]) -> String {
    let mut out = String::from("// assets.h, generated by rle565\n");

    for (id, blob) in identifiers.iter().zip(blobs) {
        let name = symbol(id);
        let _ = write!(
            out,
            "\n/*\n * 8 bit RLE encoded image, 16bpp\n * {id}: {} bytes\n * structure: {{ uint32 w, h; unsigned char data[] }}\n */\n",
            blob.len()
        );
        let _ = writeln!(out, "const unsigned char data_{name}[] = {{");
        for row in blob.chunks(16) {
            out.push_str("  ");
            for byte in row {
                let _ = write!(out, "0x{byte:02x}, ");
            }
            out.push('\n');
        }
        out.push_str("};\n");
    }

    out.push_str("\nconst unsigned char *assets[] = {\n");
    for id in identifiers {
        let _ = writeln!(out, "  data_{},", symbol(id));
    }
    out.push_str("};\n");

    out
}

fn symbol(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
