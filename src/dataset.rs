/// Layout constants for the AI4Boundaries dataset as served by the JRC
/// open-data file server.
pub struct Dataset {
    /// Crawl origin; also the prefix stripped when mapping URLs to disk.
    pub root_url: &'static str,
    /// Path segment flattened out of the local mirror.
    pub elided_segment: &'static str,
    /// URLs whose sub-path contains this marker are internal server paths
    /// and never mirrored.
    pub excluded_marker: &'static str,
    /// Link suffixes treated as downloadable data files.
    pub extensions: &'static [&'static str],
    pub citation: &'static str,
}

pub const AI4BOUNDARIES: Dataset = Dataset {
    root_url: "https://jeodpp.jrc.ec.europa.eu/ftp/jrc-opendata/DRLL/AI4BOUNDARIES/",
    elided_segment: "DRLL/",
    excluded_marker: "ftp",
    extensions: &[".tif", ".nc"],
    citation: "d'Andrimont, R., Claverie, M., Kempeneers, P., Muraro, D., Yordanov, M., \
               Peressutti, D., Batič, M., and Waldner, F.: AI4Boundaries: an open AI-ready \
               dataset to map field boundaries with Sentinel-2 and aerial photography, \
               Earth Syst. Sci. Data Discuss. [preprint], \
               https://doi.org/10.5194/essd-2022-298, in review, 2022.",
};
